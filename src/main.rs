//! prompt-relay binary entry point.

use std::io::Write;

use prompt_relay::cli::{self, Args};
use prompt_relay::config::Config;
use prompt_relay::{activate, logging, LineShell, PromptRenderer, Session, SessionKey};
use tracing::{debug, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::parse_args()?;
    if args.help {
        cli::print_help();
        return Ok(());
    }
    if args.version {
        cli::print_version();
        return Ok(());
    }

    let config = Config::load(&args)?;
    logging::try_init_with(config.log_filter()).ok();

    let renderer = config.to_renderer()?;
    let session_name = args
        .session
        .clone()
        .unwrap_or_else(|| format!("prompt-relay-{}", std::process::id()));
    debug!(program = renderer.program(), session = %session_name, "configuration loaded");

    if args.once {
        return render_once(&args, &session_name, PromptRenderer::new(renderer));
    }

    info!("prompt-relay v{}", env!("CARGO_PKG_VERSION"));

    let mut shell = LineShell::new();
    let session = Session::shared(session_name);
    activate(&mut shell, &session, PromptRenderer::new(renderer))?;

    let stdin = std::io::stdin();
    shell.repl(stdin.lock(), std::io::stdout())?;
    Ok(())
}

/// Render a single prompt with the given status and duration.
fn render_once(
    args: &Args,
    session_name: &str,
    prompt: PromptRenderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = prompt.renderer();
    let width = args.width.unwrap_or_else(prompt_relay::host::terminal_width);
    let ctx = renderer.context(
        &SessionKey::derive(session_name),
        args.status,
        width,
        args.duration_ms,
    );

    let styled = prompt.render(&ctx)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(styled.to_ansi().as_bytes())?;
    stdout.flush()?;
    Ok(())
}
