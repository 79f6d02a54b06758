fn main() {
    let cli = treemerge::cli::parse();
    let code = treemerge::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
