fn main() -> anyhow::Result<()> {
    almanac::Cli::run()
}
