use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    ponder::cli::main()
}
