use std::io::{ self, BufRead, Write };
use std::sync::Arc;

use dex_trader::{ ChainClient, Config, EvmChainClient, Result, TradeService };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "dex_trader=info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let chain = Arc::new(EvmChainClient::from_config(&config)?);

    match chain.network().await {
        Ok(network) => tracing::info!("Connected to network: {}", network),
        Err(e) => tracing::warn!("Could not identify network yet: {}", e),
    }

    let service = Arc::new(TradeService::new(chain));

    println!("dex-trader interactive session");
    println!("commands: sell <address> | buy <address> | amount <value> | approve | trade | status | quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut buffer = String::new();
        match stdin.lock().read_line(&mut buffer) {
            Ok(0) => {
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }

        let line = buffer.trim();
        let (command, value) = match line.split_once(' ') {
            Some((command, value)) => (command, value.trim()),
            None => (line, ""),
        };

        match command {
            "sell" => {
                service.update_sell_token(value).await;
                print_validation(&service);
            }
            "buy" => {
                service.update_buy_token(value).await;
                print_validation(&service);
            }
            "amount" => {
                service.update_token_amount(value).await;
                print_validation(&service);
            }
            "approve" => {
                if service.can_approve() {
                    service.approve().await;
                    println!("approval submitted; the allowance updates once it mines, re-edit a field to re-check");
                } else {
                    println!("approval not required for the current inputs");
                }
            }
            "trade" => {
                if service.can_trade() {
                    let service = service.clone();
                    tokio::spawn(async move { service.trade().await });
                    println!("trade started; follow it with 'status'");
                } else {
                    println!("trade unavailable: a trade is pending or the inputs are unresolved");
                }
            }
            "status" => print_status(&service),
            "quit" | "exit" => {
                break;
            }
            "" => {}
            other => println!("unknown command '{}'", other),
        }
    }

    Ok(())
}

fn print_validation<C: ChainClient>(service: &TradeService<C>) {
    let errors = service.errors();
    for (field, message) in [
        ("sell token", &errors.sell_token),
        ("buy token", &errors.buy_token),
        ("amount", &errors.token_amount),
    ] {
        if let Some(message) = message {
            println!("  {} error: {}", field, message);
        }
    }

    let validated = service.validated();
    if let Some(sell) = &validated.sell_token {
        println!("  selling: {} ({})", sell.symbol, sell.name);
    }
    if let Some(buy) = &validated.buy_token {
        println!("  buying:  {} ({})", buy.symbol, buy.name);
    }
    if validated.needs_approve == Some(true) {
        println!("  the router needs approval for this amount");
    }
}

fn print_status<C: ChainClient>(service: &TradeService<C>) {
    match service.pending_trade() {
        Some(trade) =>
            println!(
                "{}",
                serde_json::to_string(&trade).unwrap_or_else(|_|
                    format!("{:?} - {}", trade.status, trade.description)
                )
            ),
        None => println!("idle - no pending trade"),
    }
}
