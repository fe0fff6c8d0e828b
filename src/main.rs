use clap::{Parser, ValueEnum};
use imagen_studio::{
    config::StudioConfig,
    logger::{self, LogLevel, LoggerConfig},
    studio::ERROR_DIALOG_TITLE,
    AspectRatio, ConfigField, ImagenClient, ImagenModel, PersonGeneration, ResultArea, SessionState,
    Studio, SubmitOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Fast,
    Standard,
    Ultra,
}

impl From<ModelArg> for ImagenModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Fast => ImagenModel::Fast,
            ModelArg::Standard => ImagenModel::Standard,
            ModelArg::Ultra => ImagenModel::Ultra,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PersonArg {
    AllowAll,
    AllowAdult,
    DontAllow,
}

impl From<PersonArg> for PersonGeneration {
    fn from(arg: PersonArg) -> Self {
        match arg {
            PersonArg::AllowAll => PersonGeneration::AllowAll,
            PersonArg::AllowAdult => PersonGeneration::AllowAdult,
            PersonArg::DontAllow => PersonGeneration::DontAllow,
        }
    }
}

fn parse_aspect_ratio(value: &str) -> Result<AspectRatio, String> {
    AspectRatio::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = AspectRatio::ALL.iter().map(|r| r.as_str()).collect();
        format!("unsupported aspect ratio '{}' (expected one of {})", value, allowed.join(", "))
    })
}

/// Generate images from a text prompt with Imagen 4.
#[derive(Debug, Parser)]
#[command(name = "imagen-studio", version)]
struct Cli {
    /// What the image should show
    prompt: Option<String>,

    #[arg(long, value_enum, default_value_t = ModelArg::Fast)]
    model: ModelArg,

    /// Number of images, clamped to 1-4
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    count: i64,

    #[arg(long, default_value = "1:1", value_parser = parse_aspect_ratio)]
    aspect_ratio: AspectRatio,

    #[arg(long, value_enum, default_value_t = PersonArg::AllowAll)]
    person_generation: PersonArg,

    /// Where downloads are written (defaults to IMAGEN_OUTPUT_DIR or .)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write all images as one zip archive
    #[arg(long)]
    zip: bool,

    #[arg(long)]
    debug: bool,

    /// List the available models and exit
    #[arg(long)]
    list_models: bool,
}

fn print_error_dialog(state: &SessionState) {
    if let Some(error) = state.error() {
        eprintln!("{}", ERROR_DIALOG_TITLE);
        eprintln!("{}", error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let mut config = StudioConfig::from_env();
    if let Some(out) = &cli.out {
        config = config.with_output_dir(out);
    }
    if cli.debug {
        config = config.with_debug(true);
    }

    let logger_config = if config.debug {
        LoggerConfig::development()
    } else {
        LoggerConfig::new().with_level(LogLevel::Warn)
    };
    logger::init_with_config(logger_config)?;

    if env_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    logger::log_config_info(&config);

    if cli.list_models {
        for (id, name) in ImagenClient::supported_models() {
            println!("{:<32} {}", id, name);
        }
        return Ok(());
    }

    std::fs::create_dir_all(&config.output_dir)?;

    let client = ImagenClient::new(config.imagen.clone());
    let mut studio = Studio::new(Arc::new(client));

    studio.set_prompt(cli.prompt.clone().unwrap_or_default());
    studio.set_config_field(ConfigField::Model(cli.model.into()));
    studio.set_config_field(ConfigField::ImageCount(cli.count));
    studio.set_config_field(ConfigField::AspectRatio(cli.aspect_ratio));
    studio.set_config_field(ConfigField::PersonGeneration(cli.person_generation.into()));

    let request = studio.state().request();
    println!(
        "{} | {} image(s) | {} | {}",
        request.model.display_name(),
        request.image_count.get(),
        request.aspect_ratio,
        request.person_generation.display_name()
    );
    println!("{}", ResultArea::Loading.headline());

    match studio.submit().await {
        Ok(SubmitOutcome::Generated) => {}
        Ok(SubmitOutcome::Busy) => {
            log::warn!("A generation is already running, nothing was sent");
            return Ok(());
        }
        Err(_) => {
            print_error_dialog(studio.state());
            std::process::exit(1);
        }
    }

    println!("{}", studio.state().result_area().headline());
    for index in 0..studio.state().images().len() {
        let path = studio.download_image(index, &config.output_dir)?;
        println!("  {}", path.display());
    }

    if cli.zip {
        match studio.download_all().await {
            Ok(Some(archive)) => {
                let path = archive.save(&config.output_dir)?;
                println!("  {}", path.display());
            }
            Ok(None) => log::warn!("Nothing to archive"),
            Err(_) => {
                print_error_dialog(studio.state());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
