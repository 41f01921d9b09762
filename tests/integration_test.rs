use chrono::Local;
use cnn_accel::{
    accelerator::{pack, unpack, BitVector, MapShape, PipelineControl, System},
    input_map::read_feature_map,
    settings::Settings,
    SimResult,
};
use itertools::Itertools;

#[test]
fn test_system() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info).unwrap_or(());

    let start_time = std::time::Instant::now();
    let mut results = SimResult::new();

    let settings = Settings::new(vec!["configs/default.toml".into()])?;
    results.settings = Some(settings.clone());

    let mut system = System::new(
        &settings.accelerator_settings,
        &settings.simulation_settings,
    )?;
    let input_shape = system.geometry().input_shape()?;
    let inputs: Vec<_> = settings
        .input_paths
        .iter()
        .map(|x| read_feature_map(x.as_str(), &input_shape))
        .try_collect()?;

    // run the system
    let mut stat = system.run(&inputs)?;
    stat.simulation_time = format!("{}s", start_time.elapsed().as_secs());

    // a rising edge only produces negative responses, which the activation clamps to zero
    assert_eq!(stat.passes[0].output, vec![vec![0, 0], vec![0, 0]]);
    // the falling edge in the top half survives, the bottom half is clamped
    assert_eq!(stat.passes[1].output, vec![vec![27, 27], vec![0, 0]]);
    assert_eq!(stat.cycle, 14);

    results.stats = Some(stat);
    let output_dir = std::env::temp_dir().join("cnn_accel_output");
    std::fs::create_dir_all(&output_dir)?;
    let current_time: String = Local::now().format("%Y-%m-%d-%H-%M-%S%.6f").to_string();
    let output_path = output_dir.join(format!("{}.json", current_time));
    std::fs::write(output_path, serde_json::to_string_pretty(&results)?)?;
    Ok(())
}

#[test]
fn test_system_padded() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info).unwrap_or(());

    let settings = Settings::new(vec![
        "configs/default.toml".into(),
        "configs/optional_configs/padded.toml".into(),
    ])?;
    let mut system = System::new(
        &settings.accelerator_settings,
        &settings.simulation_settings,
    )?;
    let geometry = *system.geometry();
    assert_eq!((geometry.conv_out_rows, geometry.conv_out_cols), (6, 6));
    assert_eq!((geometry.pool_out_rows, geometry.pool_out_cols), (3, 3));

    let input_shape = geometry.input_shape()?;
    let input = read_feature_map(&settings.input_paths[1], &input_shape)?;
    let stat = system.run(&[input])?;
    let output = &stat.passes[0];
    assert_eq!(output.output_bits.len(), geometry.final_out_width);
    let decoded = unpack(&output.output_bits, &geometry.pool_out_shape()?)?;
    assert_eq!(decoded.to_rows(), output.output);
    // nothing negative leaves the activation layer, so nothing negative is pooled
    assert!(output.output.iter().flatten().all(|&v| v >= 0));
    Ok(())
}

/// drive the enables by hand: the activation layer holds its value until output is enabled
#[test]
fn test_hold_between_stages() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new(vec!["configs/default.toml".into()])?;
    let mut system = System::new(
        &settings.accelerator_settings,
        &settings.simulation_settings,
    )?;
    let geometry = *system.geometry();
    let input = read_feature_map(&settings.input_paths[1], &geometry.input_shape()?)?;
    let flat = pack(&input);

    let compute = |conv, activation| PipelineControl {
        conv,
        activation,
        ..Default::default()
    };
    use cnn_accel::accelerator::EnablePhase as P;
    system.cycle(&PipelineControl::clear(), &flat)?;
    system.cycle(&compute(P::COMPUTE, P::IDLE), &flat)?;
    system.cycle(&compute(P::OUTPUT, P::IDLE), &flat)?;
    system.cycle(&compute(P::IDLE, P::COMPUTE), &flat)?;
    let zeros = BitVector::zeros(MapShape::new(18, 4, 4)?.bit_len());
    for _ in 0..5 {
        system.cycle(&compute(P::IDLE, P::IDLE), &flat)?;
        assert_eq!(system.activation_output(), &zeros);
    }
    system.cycle(&compute(P::IDLE, P::OUTPUT), &flat)?;
    let activated = unpack(system.activation_output(), &geometry.conv_out_shape()?)?;
    assert_eq!(
        activated.to_rows(),
        vec![
            vec![0, 27, 27, 0],
            vec![0, 9, 9, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0]
        ]
    );
    assert_eq!(system.total_cycle(), 10);
    Ok(())
}
