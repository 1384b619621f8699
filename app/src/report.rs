// In app/src/report.rs

use accounting::SessionSummary;
use events::{DayUpdate, Liquidation, PositionClosed, PositionOpened};

/// Prints the final session report.
pub fn print_report(summary: &SessionSummary) {
    println!("\n--- Session Report ({}) ---", summary.scenario);
    println!("----------------------------------------");
    println!(
        "  - Days: {} elapsed | {} remaining",
        summary.days_elapsed, summary.days_remaining
    );
    println!(
        "  - Final Prices: spot {:.2} | futures {:.2} | basis {:.2}",
        summary.final_spot_price, summary.final_futures_price, summary.final_basis
    );
    println!("  - Cash: ${:.2} | Equity: ${:.2}", summary.cash, summary.equity);
    println!(
        "  - Net P&L: ${:.2} ({:.2}%)",
        summary.net_pnl_absolute, summary.net_pnl_percentage
    );
    println!(
        "  - Best P&L: ${:.2} | Worst P&L: ${:.2} | Max Drawdown: ${:.2}",
        summary.best_pnl, summary.worst_pnl, summary.max_drawdown
    );

    let status = if summary.is_liquidated {
        "LIQUIDATED"
    } else if summary.position_open {
        "OPEN"
    } else {
        "FLAT"
    };
    println!("  - Status: {status} | History points: {}", summary.history_len);
    println!("----------------------------------------");
}

pub fn print_opened(opened: &PositionOpened) {
    println!(
        "Opened: long {} spot @ {:.2}, short {} futures @ {:.2}. Cash left ${:.2}.",
        opened.quantity,
        opened.entry_spot_price,
        opened.quantity,
        opened.entry_futures_price,
        opened.cash_after
    );
}

pub fn print_day(update: &DayUpdate) {
    let point = &update.point;
    println!(
        "[Day {:>3} | T-{:<3}] spot {:>10.2} | futures {:>10.2} | basis {:>7.2} | P&L {:>10.2} | margin {:.2}/{:.2}",
        point.day,
        update.time_to_maturity,
        point.spot,
        point.futures,
        point.basis,
        point.pnl,
        update.margin.required_margin,
        update.margin.equity
    );
}

pub fn print_liquidation(liquidation: &Liquidation) {
    println!(
        "MARGIN CALL on day {}: equity ${:.2} below required ${:.2}. Position liquidated.",
        liquidation.day, liquidation.equity, liquidation.required_margin
    );
}

pub fn print_closed(closed: &PositionClosed) {
    println!(
        "Closed: spot @ {:.2}, futures @ {:.2}. Realized P&L ${:.2}, cash ${:.2}.",
        closed.exit_spot_price, closed.exit_futures_price, closed.realized_pnl, closed.cash_after
    );
}
