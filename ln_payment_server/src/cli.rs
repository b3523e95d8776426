use std::{env, env::VarError};

/// There's no real CLI for the server. Any argument prints the help text and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 14] = [
        "RUST_LOG",
        "LPG_HOST",
        "LPG_PORT",
        "LPG_DATABASE_URL",
        "LPG_SCAN_INTERVAL_SECS",
        "LPG_SCAN_CONCURRENCY",
        "LPG_FIAT_CURRENCY",
        "LPG_MAX_RATE_AGE_SECS",
        "LPG_LN_FEE_BPS",
        "LPG_LOCK_TIMEOUT_SECS",
        "LPG_LND_PUBKEY",
        "LPG_LND_REST_URL",
        "LPG_LND_TLS_CERT_PATH",
        "LPG_LND_ACCEPT_INVALID_CERTS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
