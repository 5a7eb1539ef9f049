use clap::{error::ErrorKind, CommandFactory, Parser};
use directories::ProjectDirs;
use presentrs::{Config, ExportOptions, Exporter, PackageOptions, PaletteRegistry};
use std::{
    env,
    path::{Path, PathBuf},
};

/// Turn notebooks and source files into syntax highlighted OpenDocument slides.
#[derive(Parser)]
#[command(author, version, about, arg_required_else_help = true)]
struct Cli {
    /// The notebook or source file to convert.
    path: Option<PathBuf>,

    /// Where to write the presentation. Directories get a file named after the input.
    #[clap(short, long, default_value = ".")]
    output: PathBuf,

    /// The palette to style slides with.
    #[clap(short, long, visible_alias = "theme")]
    palette: Option<String>,

    /// Include the outputs of notebook code cells.
    #[clap(long)]
    outputs: bool,

    /// List all available palettes.
    #[clap(long)]
    list_palettes: bool,

    /// The path to the configuration file.
    #[clap(short, long)]
    config_file: Option<PathBuf>,

    /// Generate a JSON schema for the configuration file.
    #[clap(long)]
    generate_config_file_schema: bool,

    /// Increase logging verbosity.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Indent every XML file in the generated package.
    #[clap(long, hide = true)]
    prettify: bool,

    /// Keep the staged package contents around.
    #[clap(long, hide = true)]
    keep_intermediate: bool,
}

struct Customizations {
    config: Config,
    palettes: PaletteRegistry,
}

fn config_directory() -> Option<PathBuf> {
    match env::var("XDG_CONFIG_HOME") {
        Ok(path) => Some(Path::new(&path).join("presentrs")),
        Err(_) => ProjectDirs::from("", "", "presentrs").map(|dirs| dirs.config_dir().into()),
    }
}

fn load_customizations(config_file_path: Option<PathBuf>) -> Result<Customizations, Box<dyn std::error::Error>> {
    let Some(configs_path) = config_directory() else {
        let config = match config_file_path {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };
        return Ok(Customizations { config, palettes: PaletteRegistry::default() });
    };
    let mut palettes = PaletteRegistry::default();
    let palettes_path = configs_path.join("palettes");
    if palettes_path.is_dir() {
        palettes.register_from_directory(&palettes_path)?;
    }
    let config_file_path = config_file_path.unwrap_or_else(|| configs_path.join("config.yaml"));
    let config = Config::load(&config_file_path)?;
    Ok(Customizations { config, palettes })
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.generate_config_file_schema {
        #[cfg(feature = "json-schema")]
        {
            let schema = schemars::schema_for!(Config);
            serde_json::to_writer_pretty(std::io::stdout(), &schema)
                .map_err(|e| format!("failed to write schema: {e}"))?;
            return Ok(());
        }
        #[cfg(not(feature = "json-schema"))]
        Cli::command().error(ErrorKind::InvalidValue, "json-schema support was not enabled during compilation").exit();
    }

    let Customizations { config, palettes } = load_customizations(cli.config_file.clone())?;
    if cli.list_palettes {
        for name in palettes.palette_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(path) = cli.path else {
        Cli::command().error(ErrorKind::MissingRequiredArgument, "no path specified").exit();
    };
    let options = ExportOptions {
        palette: cli.palette.unwrap_or_else(|| config.defaults.palette().to_string()),
        include_outputs: cli.outputs || config.defaults.outputs,
        page: config.page,
        fonts: config.fonts,
        package: PackageOptions { indent: cli.prettify, keep_intermediate: cli.keep_intermediate },
    };
    let summary = Exporter::new(&palettes, options).export(&path, &cli.output)?;
    if let Some(path) = summary.intermediate {
        eprintln!("intermediate files kept in {}", path.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
