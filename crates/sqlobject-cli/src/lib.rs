mod cli;
mod connect;
mod inspect;
mod output;
mod rows;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Describe(args) => inspect::describe(args).await,
        cli::Command::Count(args) => inspect::count(args).await,
        cli::Command::Get(args) => rows::get(args).await,
        cli::Command::List(args) => rows::list(args).await,
    }
}
