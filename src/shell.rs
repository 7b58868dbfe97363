use anyhow::{Context, Result};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use signal_desk::config::SharedConfig;
use signal_desk::desk::{Desk, SignalRequest};
use signal_desk::feed::{SignalSource, SimulatedSource};
use signal_desk::models::{CloseReason, ScanTimeframe, TradingStyle};
use signal_desk::scanner::{spawn_periodic, ScanFeed, ScanHandle};
use signal_desk::strategies::signals::{ScanRow, TradeSignal};
use signal_desk::trading::Trade;

const HELP: &str = "\
commands:
  market <SYMBOL>            select market (XAUUSD, EURUSD, GBPUSD, BTCUSD, ETHUSD, US30, NAS100)
  style scalp|swing          select trading style
  generate [balance]         generate a signal, or dismiss the one on display
  open                       open a trade from the displayed signal
  close <id> tp|sl|manual    close a trade (id or unique prefix)
  price <value>              check open trades on the current market against a price
  trades [json]              list trades
  stats                      trade outcome summary
  clear                      remove closed trades
  scan [hourly|minute]       rescan now, optionally switching timeframe
  help | quit";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Market(String),
    Style(TradingStyle),
    Generate(Option<String>),
    Open,
    Close(String, CloseReason),
    Price(f64),
    Trades { json: bool },
    Stats,
    Clear,
    Scan(Option<ScanTimeframe>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let head = parts.next().unwrap_or("").to_ascii_lowercase();
        let arg = parts.next();
        let cmd = match head.as_str() {
            "market" => Command::Market(arg.context("usage: market <SYMBOL>")?.to_string()),
            "style" => Command::Style(arg.context("usage: style scalp|swing")?.parse()?),
            "generate" | "gen" | "g" => Command::Generate(arg.map(str::to_string)),
            "open" => Command::Open,
            "close" => {
                let id = arg.context("usage: close <id> tp|sl|manual")?.to_string();
                let reason = parts.next().context("usage: close <id> tp|sl|manual")?;
                Command::Close(id, reason.parse()?)
            }
            "price" => {
                let price = arg
                    .context("usage: price <value>")?
                    .parse::<f64>()
                    .context("price must be a number")?;
                anyhow::ensure!(price.is_finite(), "price must be a finite number");
                Command::Price(price)
            }
            "trades" | "t" => Command::Trades {
                json: arg.is_some_and(|a| a.eq_ignore_ascii_case("json")),
            },
            "stats" => Command::Stats,
            "clear" => Command::Clear,
            "scan" => Command::Scan(arg.map(str::parse::<ScanTimeframe>).transpose()?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => anyhow::bail!("unknown command '{}', try 'help'", other),
        };
        Ok(cmd)
    }
}

pub struct DeskShell {
    config: SharedConfig,
    desk: Desk,
    scanner: Option<ScanHandle>,
    scan_rows: watch::Receiver<Vec<ScanRow>>,
    balance: String,
}

impl DeskShell {
    pub async fn new(config: SharedConfig) -> Self {
        let cfg = config.read().await;

        info!("{}", "=".repeat(60));
        info!("Signal desk starting up");
        info!("Market: {} | Style: {}", cfg.default_market, cfg.default_style);
        info!(
            "Latency: signal={}ms scan={}ms | Scan every {}s on {}",
            cfg.signal_delay_ms, cfg.scan_delay_ms, cfg.scan_interval_secs, cfg.scan_market
        );
        if let Some(seed) = cfg.rng_seed {
            info!("RNG seed: {}", seed);
        }
        info!("{}", "=".repeat(60));

        let desk = Desk::new(&cfg, Box::new(SimulatedSource::new(&cfg)));

        // Separate stream for the scanner so its draws don't shift the desk's.
        let mut scan_cfg = cfg.clone();
        scan_cfg.rng_seed = cfg.rng_seed.map(|s| s.wrapping_add(1));
        let scan_source: Box<dyn SignalSource> = Box::new(SimulatedSource::new(&scan_cfg));
        let handle = start_scanner(scan_source, ScanTimeframe::Hourly, &scan_cfg);
        let scan_rows = handle.subscribe();
        let balance = cfg.default_balance.to_string();

        drop(cfg);

        Self {
            config,
            desk,
            scanner: Some(handle),
            scan_rows,
            balance,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Desk ready. Type 'help' for commands, Ctrl+C to stop.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    break;
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(cmd) => self.handle(cmd).await,
                        Err(e) => println!("{e:#}"),
                    }
                }
                changed = self.scan_rows.changed(), if self.scanner.is_some() => {
                    match changed {
                        Ok(()) => {
                            let rows = self.scan_rows.borrow_and_update().clone();
                            print_scan(&rows);
                        }
                        Err(_) => {
                            warn!("Scanner stopped unexpectedly");
                            self.scanner = None;
                        }
                    }
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Market(symbol) => self.desk.set_market(&symbol),
            Command::Style(style) => self.desk.set_style(style),
            Command::Generate(balance) => {
                if let Some(b) = balance {
                    self.balance = b;
                }
                println!("Analyzing {} {}...", self.desk.market(), self.desk.style());
                match self.desk.request_signal(&self.balance).await {
                    Ok(SignalRequest::Generated(signal)) => print_signal(&signal),
                    Ok(SignalRequest::Cleared) => println!("Signal dismissed."),
                    Err(e) => println!("{e:#}"),
                }
            }
            Command::Open => match self.desk.open_displayed() {
                Some(trade) => println!("Opened trade {}", short_id(trade)),
                None => println!("No signal on display. Run 'generate' first."),
            },
            Command::Close(prefix, reason) => {
                let id = self.desk.book().find_by_prefix(&prefix).map(|t| t.id);
                match id {
                    Some(id) => {
                        if self.desk.close_trade(id, reason) {
                            println!("Closed {} ({:?})", prefix, reason);
                        } else {
                            println!("Trade {} is already closed.", prefix);
                        }
                    }
                    None => println!("No unique trade matches '{}'.", prefix),
                }
            }
            Command::Price(price) => {
                let market = self.desk.market().to_string();
                let closed = self.desk.book_mut().check_price(&market, price);
                if closed.is_empty() {
                    println!("No open {} trades triggered.", market);
                }
                for t in &closed {
                    println!("{} {} -> {}", short_id(t), t.signal.direction, t.status);
                }
            }
            Command::Trades { json } => self.print_trades(json),
            Command::Stats => {
                let s = self.desk.book().stats();
                println!(
                    "Open: {} | TP: {} | SL: {} | Manual: {} | Win rate: {}% | Total R: {:+.2}",
                    s.open, s.closed_tp, s.closed_sl, s.closed_manual, s.win_rate, s.total_r
                );
                match &self.scanner {
                    Some(h) if h.is_running() => println!("Scanner: {} running", h.timeframe),
                    _ => println!("Scanner: stopped"),
                }
            }
            Command::Clear => {
                let removed = self.desk.clear_history();
                println!("Removed {} closed trades.", removed);
            }
            Command::Scan(tf) => self.rescan(tf).await,
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    /// Restart the scanner, which refreshes immediately. Switching timeframe
    /// cancels the old loop first so only one is ever running.
    async fn rescan(&mut self, tf: Option<ScanTimeframe>) {
        let cfg = self.config.read().await.clone();
        let current = self.scanner.as_ref().map(|h| h.timeframe);
        let timeframe = tf.or(current).unwrap_or(ScanTimeframe::Hourly);

        let source = match self.scanner.take() {
            Some(handle) => handle.cancel().await,
            None => None,
        };
        let source = source.unwrap_or_else(|| Box::new(SimulatedSource::new(&cfg)));

        let handle = start_scanner(source, timeframe, &cfg);
        self.scan_rows = handle.subscribe();
        self.scanner = Some(handle);
        println!("Scanning {} candle structure...", timeframe);
    }

    fn print_trades(&self, json: bool) {
        let trades = self.desk.book().trades();
        if json {
            match serde_json::to_string_pretty(trades) {
                Ok(s) => println!("{s}"),
                Err(e) => println!("Failed to serialize trades: {e}"),
            }
            return;
        }
        if trades.is_empty() {
            println!("No trades.");
            return;
        }
        println!("{} Positions Running", self.desk.book().open_trades().count());
        println!(
            "{:<10} {:<8} {:<6} {:<5} {:>12} {:>12} {:>12}  {}",
            "ID", "MARKET", "STYLE", "SIDE", "ENTRY", "STOP", "TP1", "STATUS"
        );
        for t in trades {
            println!(
                "{:<10} {:<8} {:<6} {:<5} {:>12} {:>12} {:>12}  {}",
                short_id(t),
                t.signal.market,
                t.signal.style,
                t.signal.direction,
                t.signal.entry_text(),
                t.signal.stop_text(),
                t.signal.format_price(t.signal.take_profits[0]),
                t.status
            );
        }
    }

    async fn shutdown(&mut self) {
        info!("Shutting down...");
        if let Some(handle) = self.scanner.take() {
            handle.cancel().await;
        }
        let s = self.desk.book().stats();
        info!(
            "Session trades: open={} tp={} sl={} manual={} | win rate {}%",
            s.open, s.closed_tp, s.closed_sl, s.closed_manual, s.win_rate
        );
        info!("Desk stopped.");
    }
}

fn start_scanner(
    source: Box<dyn SignalSource>,
    timeframe: ScanTimeframe,
    cfg: &signal_desk::config::Config,
) -> ScanHandle {
    let feed = ScanFeed::new(timeframe, &cfg.scan_market, cfg.display_tz);
    spawn_periodic(source, feed, cfg.scan_interval())
}

fn short_id(trade: &Trade) -> String {
    trade.id.to_string()[..8].to_string()
}

fn print_signal(s: &TradeSignal) {
    println!("{} {} {} | confidence {}%", s.market, s.style, s.direction, s.confidence);
    println!("  Entry: {}", s.entry_text());
    println!("  Stop:  {}", s.stop_text());
    for (i, tp) in s.take_profit_texts().iter().enumerate() {
        println!("  TP{}:   {}", i + 1, tp);
    }
    println!("  {}", s.reasoning);
}

fn print_scan(rows: &[ScanRow]) {
    for r in rows {
        println!(
            "[scan] {} {} {} {:?} entry {} target {} {:?}",
            r.time,
            r.market,
            r.style,
            r.kind,
            r.entry_text(),
            r.target_text(),
            r.status
        );
    }
}
