//! Headless entry point: replay a scenario and print the resulting document.

#[cfg(feature = "native")]
use clap::Parser;

#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "vecdraw", about = "Replay a vecdraw scenario and print the resulting document")]
struct Cli {
    /// Scenario JSON file.
    scenario: std::path::PathBuf,

    /// Also save the document under this name in the user's document directory.
    #[arg(long)]
    save: Option<String>,
}

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "native")]
fn run(cli: Cli) -> vecdraw_app::AppResult<()> {
    use vecdraw_app::Scenario;
    use vecdraw_core::FileStorage;
    use vecdraw_render::RecordingRenderer;

    log::info!("Running scenario {}", cli.scenario.display());
    let json = std::fs::read_to_string(&cli.scenario)?;
    let mut editor = Scenario::from_json(&json)?.run()?;

    let mut renderer = RecordingRenderer::new();
    editor.render(&mut renderer, 1.0)?;
    if let Some(frame) = renderer.last_frame() {
        log::info!("Final frame has {} draw commands", frame.commands.len());
    }

    if let Some(name) = &cli.save {
        let storage = FileStorage::default_location()?;
        editor.save_to(&storage, name)?;
    }

    println!("{}", editor.save_json()?);
    editor.dispose()
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
}
