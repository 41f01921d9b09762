use chrono::Local;
use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use cnn_accel::{
    cmd_args::Args, input_map::read_feature_map, settings::Settings, SimResult, System,
};
use log::info;
use std::io;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info)?;
    let start_time = std::time::Instant::now();

    let mut config_names = vec![String::from("configs/default.toml")];
    let args = Args::parse();
    if let Some(generator) = args.generator {
        let mut cmd = Args::command();
        eprintln!("Generating completion file for {:?}...", generator);
        print_completions(generator, &mut cmd);
        return Ok(());
    }
    info!("{:?}", args);

    // config_names append args
    config_names.extend(args.config_names);

    let mut results = SimResult::new();
    let settings = Settings::new(config_names)?;
    results.settings = Some(settings.clone());
    info!("{}", serde_json::to_string_pretty(&settings)?);

    let mut system = System::new(
        &settings.accelerator_settings,
        &settings.simulation_settings,
    )?;
    results.geometry = Some(*system.geometry());

    let input_shape = system.geometry().input_shape()?;
    let inputs = settings
        .input_paths
        .iter()
        .map(|x| read_feature_map(x.as_str(), &input_shape))
        .collect::<Result<Vec<_>, _>>()?;

    // run the system
    let mut stat = system.run(&inputs)?;

    // record the simulation time
    let simulation_time = start_time.elapsed().as_secs();
    let seconds = simulation_time % 60;
    let minutes = (simulation_time / 60) % 60;
    let hours = (simulation_time / 60) / 60;
    stat.simulation_time = format!("{}:{}:{}", hours, minutes, seconds);

    results.stats = Some(stat);
    // create the folder for output
    let output_dir = &settings.simulation_settings.output_dir;
    std::fs::create_dir_all(output_dir)?;
    let current_time: String = Local::now().format("%Y-%m-%d-%H-%M-%S%.6f").to_string();
    let output_path = format!("{}/{}.json", output_dir, current_time);

    println!("{}", serde_json::to_string_pretty(&results)?);
    // write json of results to output_path
    std::fs::write(output_path, serde_json::to_string_pretty(&results)?)?;
    Ok(())
}
