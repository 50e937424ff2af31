use chrono::Local;

use sosu_keisu::config::load_or_create_config;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(first) = args.next() else {
        eprintln!("Usage: sosu-keisu --pi <x>");
        std::process::exit(2);
    };

    if first != "--pi" {
        eprintln!("Unknown option: {first}");
        eprintln!("Usage: sosu-keisu --pi <x>");
        std::process::exit(2);
    }

    let Some(x_str) = args.next() else {
        eprintln!("Usage: sosu-keisu --pi <x>");
        std::process::exit(2);
    };

    let x = match x_str.parse::<i64>() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid x for --pi: {x_str} ({e})");
            std::process::exit(2);
        }
    };

    // settings.toml が無ければ既定値で作る（スレッド数や α の上書き用）
    let cfg = match load_or_create_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load settings.toml: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "sosu-keisu started at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    match sosu_keisu::pi_with(x, &cfg) {
        Ok(pi) => println!("pi({x}) = {pi}"),
        Err(e) => {
            eprintln!("Error while computing pi({x}): {e}");
            std::process::exit(1);
        }
    }
}
