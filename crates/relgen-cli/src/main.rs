use relgen_cli::RelgenCli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    RelgenCli::new().parse_and_run()
}
