use ornament_native::assets::AssetCommand;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    AssetCommand::parse(std::env::args().skip(1))?.run()
}
