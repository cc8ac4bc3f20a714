use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
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
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "LPS_HOST",
        "LPS_PORT",
        "LPS_DATABASE_URL",
        "LPS_DB_MAX_CONNECTIONS",
        "LPS_USER_ID_HEADER",
        "LPS_ACCRUAL_URL",
        "LPS_ACCRUAL_TIMEOUT",
        "LPS_RECONCILE_INTERVAL",
        "LPS_RECONCILE_BATCH_SIZE",
        "LPS_RECONCILER_ENABLED",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
