//! wangantools command-line entry point

fn main() -> anyhow::Result<()> {
    wangantools::cli::run_cli()
}
