use std::env;
use std::fs;
use std::process;

const USAGE: &str =
    "Usage: transcriber [--config <grid.yaml>] <settings.json> <duration-seconds> <image-height> [output.json]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    // Parse flags
    let mut config_path: Option<&String> = None;
    let mut positional: Vec<&String> = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            match iter.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("{}", USAGE);
                    process::exit(1);
                }
            }
        } else {
            positional.push(arg);
        }
    }

    if positional.len() < 3 || positional.len() > 4 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let settings_path = positional[0];
    let output_path = positional.get(3);

    let duration: f64 = match positional[1].parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Invalid duration '{}'", positional[1]);
            process::exit(1);
        }
    };
    let image_height: f64 = match positional[2].parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Invalid image height '{}'", positional[2]);
            process::exit(1);
        }
    };

    // Read inputs
    let config = match config_path {
        Some(path) => read_or_exit(path),
        None => String::new(),
    };
    let settings = read_or_exit(settings_path);

    let grid = match transcriber::render_grid(&config, &settings, duration, image_height) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let json = match serde_json::to_string_pretty(&grid) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error encoding grid: {}", e);
            process::exit(1);
        }
    };
    let summary = format!(
        "{} note lines, {} beats, {} bars at {} BPM in {}",
        grid.note_lines.len(),
        grid.beat_markers.len(),
        grid.bar_markers.len(),
        grid.settings.bpm,
        grid.settings.music_key
    );

    // Geometry goes to the file or stdout, the summary always to stderr
    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &json) {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        }
        eprintln!("{} -> {}", summary, path);
    } else {
        println!("{}", json);
        eprintln!("{}", summary);
    }
}

fn read_or_exit(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}
