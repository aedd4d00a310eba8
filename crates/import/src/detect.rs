use crate::transaction::Bank;

/// Lines examined for BBVA's column titles when no bank is named.
const HEADER_SCAN_LINES: usize = 10;

/// Guesses which bank exported `text`.
///
/// An explicit bank name wins over layout hints. Anything unrecognised is
/// treated as Santander, so an unsupported bank yields a (likely empty)
/// Santander parse rather than an error.
pub fn detect_format(text: &str) -> Bank {
    let upper = text.to_uppercase();

    let bank = if upper.contains("BBVA") || upper.contains("F.VALOR") {
        Bank::Bbva
    } else if upper.contains("SANTANDER") {
        Bank::Santander
    } else if has_bbva_columns(&upper) {
        Bank::Bbva
    } else {
        Bank::Santander
    };

    tracing::debug!("Detected {} statement format", bank);
    bank
}

fn has_bbva_columns(upper: &str) -> bool {
    let head: Vec<&str> = upper.lines().take(HEADER_SCAN_LINES).collect();
    let mentions = |word: &str| head.iter().any(|line| line.contains(word));
    mentions("DIVISA") && mentions("OBSERVACIONES")
}
