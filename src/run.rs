use color_eyre::eyre::Result;
use dotenv::dotenv;

use stock_pulse::config::RankingsConfig;
use stock_pulse::ranking::{compute_rankings, ChangeRecord};
use stock_pulse::stocks::YahooProvider;

fn print_side(title: &str, records: &[ChangeRecord]) {
    println!("{title}");
    for record in records {
        println!("  {:<6} {:>+8.2}%", record.ticker, record.change);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    color_eyre::install()?;

    let config = RankingsConfig::from_env();
    let provider = YahooProvider::new()?;

    let result = compute_rankings(&config.tickers, &provider, &config.window, config.limit).await?;

    print_side("Top gainers", &result.top);
    print_side("Top losers", &result.bottom);

    Ok(())
}
