use clap::Parser;
use matchshell::Difficulty;
use matchshell::config::Settings;
use matchshell::ui::{GameKind, app};

#[derive(Parser, Debug)]
#[command(name = "matchshell", version, about = "Card matching and shell game")]
struct Cli {
    /// Item catalog to load, a path or URI
    #[arg(long)]
    catalog: Option<String>,

    /// Game shown at startup
    #[arg(long, value_enum, default_value_t = GameKind::Memory)]
    game: GameKind,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
}

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = Settings::load();
    if let Some(catalog) = cli.catalog {
        settings.catalog = catalog;
    }
    let difficulty = cli.difficulty.unwrap_or_else(|| settings.difficulty());

    app::run(settings, cli.game, difficulty)
}
