//! Text rendering of the two screens.

use crate::error::feed_unavailable_message;
use crate::models::TimeframeBucket;
use crate::session::{Session, View};

const SOURCE_LINE: &str = "Live from CoinGecko";
const CAPTION: &str = "AI generated price based on current market volumes and BTC price";
const RULE: &str = "----------------------------------";

/// `$1,234.56`: USD with thousands separators and exactly two decimals.
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

/// `+9.12%`
pub fn format_percent(percent: f64) -> String {
    format!("+{:.2}%", percent)
}

/// Full text of whichever screen the session is on.
pub fn render(session: &Session, asset_symbol: &str) -> String {
    match session.view() {
        View::Main => render_main(session, asset_symbol),
        View::Prediction { bucket, .. } => render_prediction(session, bucket, asset_symbol),
    }
}

fn header(asset_symbol: &str) -> String {
    format!("{} AI PRICE PREDICTOR\n{}\n", asset_symbol.to_uppercase(), RULE)
}

fn render_main(session: &Session, asset_symbol: &str) -> String {
    let mut out = header(asset_symbol);
    out.push_str(&format!("{} Price\n{}\n\n", asset_symbol, SOURCE_LINE));

    if session.feed_unavailable() {
        out.push_str(&format!("⚠️ {}\n", feed_unavailable_message(asset_symbol)));
    }

    match session.price() {
        None if !session.feed_unavailable() => {
            out.push_str("Loading...\n");
        }
        None => {}
        Some(sample) => {
            out.push_str(&format!("{}\n", format_usd(sample.value)));
            out.push_str(&format!("Last updated: {}\n", sample.observed_at.format("%H:%M:%S")));
            out.push_str(&format!("\n{}\nSelect a prediction timeframe:\n", RULE));
            out.push_str(&bucket_menu(session.buckets()));
        }
    }

    out.push_str("\n[q] Quit\n");
    out
}

fn bucket_menu(buckets: &[TimeframeBucket]) -> String {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| format!("  [{}] {} ({})\n", i + 1, b.label, b.key))
        .collect()
}

fn render_prediction(session: &Session, bucket: &TimeframeBucket, asset_symbol: &str) -> String {
    let (price, percent) = match session.prediction() {
        Some(p) => (format_usd(p.predicted_price), format_percent(p.percent)),
        None => ("$--".to_string(), "+--%".to_string()),
    };

    let mut out = header(asset_symbol);
    out.push_str(&format!("Estimated price {}:\n", bucket.label.to_lowercase()));
    out.push_str(&format!("{}\n({})\n\n", price, percent));
    out.push_str(&format!("{}\n\n", CAPTION));
    if session.feed_unavailable() {
        out.push_str(&format!("⚠️ {}\n\n", feed_unavailable_message(asset_symbol)));
    }
    out.push_str("[r] Reselect timeframe\n[q] Quit\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceSample;
    use crate::session::Action;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn usd_has_two_decimals_and_grouping() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(31.4), "$31.40");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn percent_is_signed_with_two_decimals() {
        assert_eq!(format_percent(9.1234), "+9.12%");
        assert_eq!(format_percent(3000.0), "+3000.00%");
    }

    #[test]
    fn main_screen_shows_loading_before_first_price() {
        let session = Session::new(TimeframeBucket::reference_set());
        let screen = render(&session, "EGLD");
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("Select a prediction timeframe"));
    }

    #[test]
    fn main_screen_lists_price_and_buckets() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::new(TimeframeBucket::reference_set())
            .apply(Action::PriceFetched(PriceSample::now(1234.5)), &mut rng);
        let screen = render(&session, "EGLD");

        assert!(screen.contains("$1,234.50"));
        assert!(screen.contains("Last updated: "));
        assert!(screen.contains("[4] Next Year (year)"));
    }

    #[test]
    fn error_without_price_replaces_loading() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::new(TimeframeBucket::reference_set()).apply(Action::FeedFailed, &mut rng);
        let screen = render(&session, "EGLD");

        assert!(screen.contains("Could not fetch EGLD price."));
        assert!(!screen.contains("Loading..."));
    }

    #[test]
    fn error_with_stale_price_shows_both() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::new(TimeframeBucket::reference_set())
            .apply(Action::PriceFetched(PriceSample::now(20.0)), &mut rng)
            .apply(Action::FeedFailed, &mut rng);
        let screen = render(&session, "EGLD");

        assert!(screen.contains("Could not fetch EGLD price."));
        assert!(screen.contains("$20.00"));
    }

    #[test]
    fn error_names_the_configured_asset() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::new(TimeframeBucket::reference_set()).apply(Action::FeedFailed, &mut rng);
        let screen = render(&session, "BTC");

        assert!(screen.starts_with("BTC AI PRICE PREDICTOR"));
        assert!(screen.contains("BTC Price"));
        assert!(screen.contains("Could not fetch BTC price."));
        assert!(!screen.contains("EGLD"));
    }

    #[test]
    fn prediction_screen_shows_lowercase_label_and_reselect() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::new(TimeframeBucket::reference_set())
            .apply(Action::PriceFetched(PriceSample::now(100.0)), &mut rng)
            .apply(Action::SelectBucket("week".into()), &mut rng);
        let screen = render(&session, "EGLD");

        assert!(screen.contains("Estimated price next week:"));
        assert!(screen.contains("(+2"));
        assert!(screen.contains("[r] Reselect timeframe"));
    }
}
