use loopdeck::model::ShuffleAlgorithm;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CliArgs {
    no_shuffle: bool,
    no_loop: bool,
    uniform_shuffle: bool,
    null_output: bool,
    list_outputs: bool,
    device: Option<String>,
    roots: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1).collect())?;

    if args.list_outputs {
        for name in loopdeck::audio::RodioOutput::available_outputs() {
            println!("{name}");
        }
        return Ok(());
    }

    if args.roots.is_empty() {
        print_help();
        anyhow::bail!("at least one folder or audio file is required");
    }

    let mut config = loopdeck::config::load_config()?;
    if args.no_shuffle {
        config.controller.random_order_on_start = false;
    }
    if args.no_loop {
        config.controller.loop_at_end = false;
    }
    if args.uniform_shuffle {
        config.controller.shuffle_algorithm = ShuffleAlgorithm::FisherYates;
    }
    if args.device.is_some() {
        config.output_device = args.device;
    }

    loopdeck::app::run_with_startup(loopdeck::app::AppStartupOptions {
        roots: args.roots,
        config,
        null_output: args.null_output,
    })
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--no-shuffle" => out.no_shuffle = true,
            "--no-loop" => out.no_loop = true,
            "--uniform-shuffle" => out.uniform_shuffle = true,
            "--null-output" => out.null_output = true,
            "--list-outputs" => out.list_outputs = true,
            "--device" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--device requires a device name");
                };
                if value.trim().is_empty() {
                    anyhow::bail!("--device cannot be empty");
                }
                out.device = Some(value.trim().to_string());
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with("--") => anyhow::bail!("unknown argument {other}"),
            path => out.roots.push(PathBuf::from(path)),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("loopdeck <folder|file>...");
    println!("  --no-shuffle        Keep the given order at startup");
    println!("  --no-loop           Stop after the last track");
    println!("  --uniform-shuffle   Use an unbiased shuffle");
    println!("  --null-output       Do not open an audio device");
    println!("  --device NAME       Play through the named output device");
    println!("  --list-outputs      Print available output devices");
    println!();
    println!("Keys: space play/stop, left/right previous/next, 1-9 jump,");
    println!("      s shuffle, r restart, l loop, p pause, q quit");
}
