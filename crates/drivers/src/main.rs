mod config;
mod logging;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use config::AppConfig;
use photo_editor_adapters::{
    BackgroundPreviewPipeline, BackgroundUploadReader, FilterCompositor, FsDownloadSink,
    ImageCrateDecoder, PngRasterEncoder,
};
use photo_editor_application::ApplicationService;

fn main() -> ExitCode {
    logging::init_logging();
    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::default();

    let command = parse_command(&args);
    match run_command(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(config: &AppConfig) -> ApplicationService {
    let compositor = Arc::new(FilterCompositor::new());
    ApplicationService::new(
        Box::new(BackgroundUploadReader::new()),
        Box::new(ImageCrateDecoder),
        Box::new(Arc::clone(&compositor)),
        Box::new(BackgroundPreviewPipeline::new(compositor)),
        Box::new(PngRasterEncoder),
        Box::new(FsDownloadSink::new(config.download_dir.clone())),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ui { image: Option<PathBuf> },
    Help,
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    let mut rest = args.iter().skip(1).peekable();
    if rest.peek().map(|arg| arg.as_str()) == Some("ui") {
        rest.next();
    }

    let image = match rest.next().map(String::as_str) {
        None => None,
        Some("-h" | "--help" | "help") => return Ok(Command::Help),
        Some(flag) if flag.starts_with('-') => {
            return Err(CommandError::Usage(format!("unknown option: {flag}")))
        }
        Some(path) => Some(PathBuf::from(path)),
    };

    if let Some(extra) = rest.next() {
        return Err(CommandError::Usage(format!("unexpected argument: {extra}")));
    }
    Ok(Command::Ui { image })
}

fn run_command(command: Result<Command, CommandError>, config: &AppConfig) -> Result<(), CommandError> {
    match command? {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Ui { image } => {
            let service = build_application_service(config);
            ui::launch_window(service, config.clone(), image).map_err(CommandError::Runtime)
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  photo-editor [ui] [IMAGE]");
    println!("  photo-editor --help");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("photo-editor")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_opens_empty_editor() {
        let command = parse_command(&args(&[])).expect("should parse");
        assert_eq!(command, Command::Ui { image: None });
    }

    #[test]
    fn image_path_with_or_without_ui_keyword() {
        let expected = Command::Ui {
            image: Some(PathBuf::from("photo.jpg")),
        };
        assert_eq!(parse_command(&args(&["photo.jpg"])).expect("parse"), expected);
        assert_eq!(parse_command(&args(&["ui", "photo.jpg"])).expect("parse"), expected);
    }

    #[test]
    fn rejects_unknown_options_and_extra_arguments() {
        assert!(matches!(
            parse_command(&args(&["--verbose"])),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            parse_command(&args(&["ui", "a.png", "b.png"])),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn help_flag_is_recognised() {
        assert_eq!(parse_command(&args(&["--help"])).expect("parse"), Command::Help);
    }
}
