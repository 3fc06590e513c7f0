use std::env;
use std::fs;
use std::process;

use tranh::{render_song, LayoutConfig, SongData};

const USAGE: &str = "Usage: tranh [--tuning T] [--hide-bent] [--config layout.yaml] [--layout-json out.json] <song.yaml> [output.svg]";

struct Options {
    tuning: Option<String>,
    show_bent: bool,
    config_path: Option<String>,
    layout_json: Option<String>,
    input_path: String,
    output_path: Option<String>,
}

fn usage_exit() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut tuning = None;
    let mut show_bent = true;
    let mut config_path = None;
    let mut layout_json = None;
    let mut positional = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tuning" => tuning = Some(iter.next().cloned().unwrap_or_else(|| usage_exit())),
            "--hide-bent" => show_bent = false,
            "--config" => config_path = Some(iter.next().cloned().unwrap_or_else(|| usage_exit())),
            "--layout-json" => {
                layout_json = Some(iter.next().cloned().unwrap_or_else(|| usage_exit()))
            }
            flag if flag.starts_with("--") => {
                eprintln!("Unknown option '{}'", flag);
                usage_exit();
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let input_path = positional.next().unwrap_or_else(|| usage_exit());
    let output_path = positional.next();

    Options {
        tuning,
        show_bent,
        config_path,
        layout_json,
        input_path,
        output_path,
    }
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn write_file(path: &str, content: &str) {
    if let Err(e) = fs::write(path, content) {
        eprintln!("Error writing to '{}': {}", path, e);
        process::exit(1);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    // Layout geometry
    let config = match &options.config_path {
        Some(path) => match LayoutConfig::from_yaml(&read_file(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let song = match SongData::from_yaml(&read_file(&options.input_path)) {
        Ok(song) => song,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let rendered = match render_song(&song, options.tuning.as_deref(), options.show_bent, &config) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Render error: {}", e);
            process::exit(1);
        }
    };

    // Tuning report
    let analysis = &rendered.analysis;
    eprintln!(
        "Suggested tuning: {} ({} bent notes)",
        analysis.description, analysis.bent_notes
    );
    if let Some(alternative) = analysis.next_best_alternative() {
        eprintln!(
            "Next best: {} ({} bent notes)",
            alternative.tuning, alternative.bent_count
        );
    }
    eprintln!(
        "Rendered {} notes with tuning {}",
        rendered.layout.notes.len(),
        rendered.tuning
    );

    if !rendered.glissando_candidates.is_empty() {
        eprintln!(
            "{} glissando candidates",
            rendered.glissando_candidates.len()
        );
    }
    if rendered.overlay.is_some() {
        eprintln!("Phrase overlay: {} phrases", song.phrases.len());
    }

    if let Some(path) = &options.layout_json {
        match rendered.to_json() {
            Ok(json) => {
                write_file(path, &json);
                eprintln!("Wrote layout, analysis and overlay to {}", path);
            }
            Err(e) => {
                eprintln!("Error serializing layout: {}", e);
                process::exit(1);
            }
        }
    }

    match &options.output_path {
        Some(path) => {
            write_file(path, &rendered.svg);
            eprintln!("Wrote tablature to {}", path);
        }
        None => {
            println!("{}", rendered.svg);
        }
    }
}
