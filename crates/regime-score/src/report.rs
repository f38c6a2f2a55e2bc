//! Text and JSON rendering of a dashboard report.

use regime_allocation::format_currency;
use rust_decimal::Decimal;

use crate::pipeline::DashboardReport;

impl DashboardReport {
    /// Generate a text summary. The allocation section is included when a
    /// capital figure is given and a regime is available.
    pub fn summary(&self, capital: Option<Decimal>, currency: &str) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("            INSTITUTIONAL MARKET STRUCTURE REPORT           \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("MARKET\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  {:<21}{:.2}\n",
            format!("{} Close:", self.primary_symbol),
            self.last_close
        ));
        s.push_str(&format!("  As of:               {}\n", self.last_date));

        let Some(current) = &self.current else {
            s.push_str("\n  Not enough history to compute the institutional score.\n");
            return s;
        };

        s.push_str(&format!(
            "  Institutional Score: {} / 100\n",
            current.score()
        ));
        s.push_str(&format!("  Suggested Exposure:  {}\n", current.exposure()));
        s.push_str(&format!("  Market Regime:       {}\n", current.regime));
        s.push('\n');

        s.push_str("SCORE BREAKDOWN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for outcome in &current.sample.outcomes {
            s.push_str(&format!(
                "  [{}] {:<40} {:>3}\n",
                if outcome.met { "x" } else { " " },
                outcome.condition.description(),
                outcome.points()
            ));
        }
        s.push('\n');

        s.push_str("HISTORY\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Points:              {} ({} scored)\n",
            self.history.len(),
            self.defined_history()
        ));
        let scores: Vec<u8> = self.history.iter().filter_map(|p| p.score).collect();
        if let (Some(min), Some(max)) = (scores.iter().min(), scores.iter().max()) {
            s.push_str(&format!("  Range:               {} - {}\n", min, max));
        }

        if let Some(capital) = capital {
            s.push('\n');
            s.push_str("ALLOCATION\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            match self.allocation(capital) {
                Ok(Some(allocation)) => {
                    s.push_str(&format!(
                        "  Capital:             {}\n",
                        format_currency(allocation.capital, currency)
                    ));
                    s.push_str(&format!(
                        "  Equity:              {} - {}\n",
                        format_currency(allocation.equity_min, currency),
                        format_currency(allocation.equity_max, currency)
                    ));
                    s.push_str(&format!(
                        "  Cash:                {} - {}\n",
                        format_currency(allocation.cash_min, currency),
                        format_currency(allocation.cash_max, currency)
                    ));
                }
                Ok(None) => {}
                Err(e) => s.push_str(&format!("  {}\n", e)),
            }
        }

        s
    }

    /// One line per history point, `-` for missing scores.
    pub fn history_table(&self) -> String {
        let mut s = String::from("date        score\n");
        for point in &self.history {
            let date = point
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".repeat(10));
            let score = point
                .score
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            s.push_str(&format!("{}  {:>5}\n", date, score));
        }
        s
    }

    /// Export as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
