use mentii_frontend::FrontendConfig;

fn main() -> anyhow::Result<()> {
    mentii_frontend::run_frontend(FrontendConfig::from_env())
}
