use clap::Parser;
use scli::{
    cli::{Cli, Command},
    client::Client,
};
use std::process::exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = Client::new(cli.server);

    let result = match cli.command {
        Command::Write { local, remote } => client.write(&local, remote).await,
        Command::Get { remote, local } => client.get(&remote, local).await,
        Command::Rm { remote } => client.rm(&remote).await,
        Command::Ls { remote } => client.ls(&remote).await,
    };

    match result {
        Ok(s) => println!("{}", s),
        Err(error) => {
            eprintln!("{}", error);
            exit(1)
        }
    }
}
