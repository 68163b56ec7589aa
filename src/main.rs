//! claude-security-guard - Pre-edit security reminders for Claude Code
//!
//! # Usage
//!
//! ```bash
//! # As a Claude Code hook (reads JSON from stdin, exit 2 + stderr to block)
//! echo '{"tool_name":"Write","tool_input":{"file_path":"a.js","content":"eval(x)"}}' | claude-security-guard
//!
//! # Dry-run mode (print reminders but never block)
//! claude-security-guard --dry-run
//! ```

use std::env;
use std::io::{self, Read};
use std::process;

use claude_security_guard::{
    audit::AuditLogger,
    config::{Config, ENV_ENABLED, ENV_LOG, ENV_STATE_DIR, ENV_WARN_ONLY},
    input::HookInput,
    logging,
    output::HookOutput,
    rules::{Predicate, RuleCatalog},
    SecurityGuard,
};

/// Print version information
fn print_version() {
    println!("claude-security-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"claude-security-guard - Pre-edit security reminders for Claude Code

USAGE:
    claude-security-guard [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -d, --dry-run           Print reminders but never block
    -c, --config PATH       Path to config file
        --list-rules        List the active rules and exit

ENVIRONMENT:
    {enabled}=0     Disable all checks
    {warn_only}=1   Warn but don't block
    {state_dir}=DIR Directory for per-session state
    {log}=LEVEL           Diagnostics filter (e.g. debug)

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Edit|MultiEdit|Write|NotebookEdit",
          "hooks": [{{
            "type": "command",
            "command": "~/.claude/security-guard/claude-security-guard"
          }}]
        }}]
      }}
    }}
"#,
        enabled = ENV_ENABLED,
        warn_only = ENV_WARN_ONLY,
        state_dir = ENV_STATE_DIR,
        log = ENV_LOG,
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    list_rules: bool,
    dry_run: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            list_rules: false,
            dry_run: false,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "--list-rules" => result.list_rules = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn list_rules(catalog: &RuleCatalog) {
    for rule in catalog.iter() {
        let scope = match rule.predicate {
            Predicate::Substrings(needles) => needles.join(" | "),
            Predicate::Path(_) => "<file path>".to_string(),
        };
        println!("{:<30} {}", rule.id, scope);
    }
}

fn main() {
    let args = Args::parse();

    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    // Load configuration
    let mut config = match args.config_path.as_deref() {
        Some(path) => Config::load_from(std::path::Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            Config::default()
        }),
        None => Config::load(),
    };
    config.apply_env();
    if args.dry_run {
        config.general.warn_only = true;
    }

    logging::init(&config);

    if args.list_rules {
        list_rules(&RuleCatalog::builtin().without(&config.rules.disabled));
        return;
    }

    // Read JSON from stdin; an unreadable stream is treated as empty
    let mut input_json = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_json) {
        tracing::warn!(error = %e, "failed to read stdin");
    }

    if input_json.trim().is_empty() {
        process::exit(HookOutput::allow().exit_code);
    }

    // Fail open on malformed input
    let input = match HookInput::from_json(&input_json) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "malformed hook input, allowing");
            process::exit(HookOutput::allow().exit_code);
        }
    };

    let audit_path = if config.general.audit_log {
        config.audit_path()
    } else {
        None
    };
    let mut logger = AuditLogger::new(audit_path.as_deref());

    let guard = SecurityGuard::new(config);
    let decision = guard.check(&input);
    tracing::debug!(input = %input.summary(), reason = %decision.reason(), "decision");

    if let Err(e) = logger.log_decision(&input, &decision, !guard.is_enabled()) {
        tracing::warn!(error = %e, "failed to write audit log");
    }

    let output = HookOutput::from_decision(&decision);
    let code = output.emit(&mut io::stderr().lock());
    process::exit(code);
}
