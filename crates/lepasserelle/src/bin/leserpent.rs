// LeSerpent command-line entry point

fn main() -> anyhow::Result<()> {
    lepasserelle::cli::main()
}
