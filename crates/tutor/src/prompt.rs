// In crates/tutor/src/prompt.rs

use core_types::HistoryPoint;

/// How many trailing history points a summary prompt carries.
pub const SUMMARY_WINDOW: usize = 5;

pub fn explain_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an expert financial tutor specializing in basis trading (cash-and-carry arbitrage).\n\
         The learner is currently viewing the following context in the TenorArb simulator:\n\
         \"{context}\"\n\n\
         The learner asks: \"{question}\"\n\n\
         Give a concise, encouraging and accurate answer in English.\n\
         Use Markdown formatting for clarity.\n\
         If the learner is confused about the math, include a simple worked calculation."
    )
}

/// Builds the analysis prompt from the most recent history points.
pub fn summary_prompt(history: &[HistoryPoint]) -> serde_json::Result<String> {
    let start = history.len().saturating_sub(SUMMARY_WINDOW);
    let recent = serde_json::to_string(&history[start..])?;

    Ok(format!(
        "Analyze this arbitrage simulation history (spot/futures price convergence data):\n\
         {recent}\n\n\
         Explain simply in English why the profit is changing (or not) based on the \
         convergence of the spot and futures prices.\n\
         Keep it short (under 100 words)."
    ))
}
