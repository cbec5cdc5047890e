#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Describe,
    Get,
    List,
    Count,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(HelpTopic),
    Describe(DescribeArgs),
    Get(GetArgs),
    List(ListArgs),
    Count(CountArgs),
}

/// Options every command accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Overrides DATABASE_URL / DB_* settings.
    pub database: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeArgs {
    pub global: GlobalArgs,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetArgs {
    pub global: GlobalArgs,
    pub table: String,
    pub id: String,
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    pub global: GlobalArgs,
    pub table: String,
    pub page: u64,
    pub page_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountArgs {
    pub global: GlobalArgs,
    pub table: String,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let rest = it.map(|s| s.as_str());
    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "describe" => parse_describe(rest),
        "get" => parse_get(rest),
        "list" => parse_list(rest),
        "count" => parse_count(rest),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume a global option if `token` is one. Returns `Ok(true)` when it was.
fn parse_global<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    global: &mut GlobalArgs,
) -> anyhow::Result<bool> {
    match token {
        "--database" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            global.database = Some(v.to_string());
        }
        _ if token.starts_with("--database=") => {
            global.database = Some(token.trim_start_matches("--database=").to_string());
        }
        "--json" => global.json = true,
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_number(flag: &str, v: &str) -> anyhow::Result<u64> {
    v.parse::<u64>()
        .map_err(|_| anyhow::anyhow!("{flag} must be a non-negative integer, got {v:?}"))
}

fn parse_describe<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut table: Option<String> = None;

    while let Some(token) = it.next() {
        if parse_global(token, &mut it, &mut global)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Describe)),
            _ if token.starts_with('-') => anyhow::bail!("unknown argument: {token}"),
            _ if table.is_none() => table = Some(token.to_string()),
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let Some(table) = table else {
        anyhow::bail!("describe requires a table name");
    };
    Ok(Command::Describe(DescribeArgs { global, table }))
}

fn parse_get<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut key: Option<String> = None;

    while let Some(token) = it.next() {
        if parse_global(token, &mut it, &mut global)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Get)),
            "--key" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--key requires a value");
                };
                key = Some(v.to_string());
            }
            _ if token.starts_with("--key=") => {
                key = Some(token.trim_start_matches("--key=").to_string());
            }
            _ if token.starts_with('-') => anyhow::bail!("unknown argument: {token}"),
            _ if positional.len() < 2 => positional.push(token.to_string()),
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(table), Some(id)) = (positional.next(), positional.next()) else {
        anyhow::bail!("get requires a table name and an id");
    };
    Ok(Command::Get(GetArgs {
        global,
        table,
        id,
        key,
    }))
}

fn parse_list<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut table: Option<String> = None;
    let mut page = 1;
    let mut page_size = sqlobject::DEFAULT_PAGE_SIZE;

    while let Some(token) = it.next() {
        if parse_global(token, &mut it, &mut global)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::List)),
            "--page" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--page requires a value");
                };
                page = parse_number("--page", v)?;
            }
            _ if token.starts_with("--page=") => {
                page = parse_number("--page", token.trim_start_matches("--page="))?;
            }
            "--page-size" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--page-size requires a value");
                };
                page_size = parse_number("--page-size", v)?;
            }
            _ if token.starts_with("--page-size=") => {
                page_size = parse_number("--page-size", token.trim_start_matches("--page-size="))?;
            }
            _ if token.starts_with('-') => anyhow::bail!("unknown argument: {token}"),
            _ if table.is_none() => table = Some(token.to_string()),
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let Some(table) = table else {
        anyhow::bail!("list requires a table name");
    };
    if page_size == 0 {
        anyhow::bail!("--page-size must be at least 1");
    }
    Ok(Command::List(ListArgs {
        global,
        table,
        page,
        page_size,
    }))
}

fn parse_count<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();
    let mut table: Option<String> = None;

    while let Some(token) = it.next() {
        if parse_global(token, &mut it, &mut global)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Count)),
            _ if token.starts_with('-') => anyhow::bail!("unknown argument: {token}"),
            _ if table.is_none() => table = Some(token.to_string()),
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let Some(table) = table else {
        anyhow::bail!("count requires a table name");
    };
    Ok(Command::Count(CountArgs { global, table }))
}

const GLOBAL_OPTIONS: &str = "\
GLOBAL OPTIONS:
  --database <URL>      mysql:// URL (default: DATABASE_URL or DB_* variables)
  --json                Print JSON instead of a table
  -h, --help            Print help";

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqlobject - inspect MySQL tables and rows

USAGE:
  sqlobject <COMMAND> [OPTIONS]

COMMANDS:
  describe      Columns, enums, foreign keys and size of a table
  get           Read one row by key
  list          Read one page of rows
  count         Estimated row count of a table
  help          Print this message

Connection settings come from DATABASE_URL or DB_HOST, DB_PORT, DB_USER,
DB_PASSWORD, DB_NAME, DB_SCHEMA (a .env file is read if present).
Set RUST_LOG=sqlobject=debug to see the SQL that is sent.

Run `sqlobject <command> --help` for more."
            );
        }
        HelpTopic::Describe => {
            println!("USAGE:\n  sqlobject describe <TABLE> [OPTIONS]\n\n{GLOBAL_OPTIONS}");
        }
        HelpTopic::Get => {
            println!(
                "\
USAGE:
  sqlobject get <TABLE> <ID> [OPTIONS]

GET OPTIONS:
  --key <COLUMN>        Key column to match (default: guid)

{GLOBAL_OPTIONS}"
            );
        }
        HelpTopic::List => {
            println!(
                "\
USAGE:
  sqlobject list <TABLE> [OPTIONS]

LIST OPTIONS:
  --page <N>            1-based page number (default: 1)
  --page-size <N>       Rows per page (default: 10)

{GLOBAL_OPTIONS}"
            );
        }
        HelpTopic::Count => {
            println!("USAGE:\n  sqlobject count <TABLE> [OPTIONS]\n\n{GLOBAL_OPTIONS}");
        }
    }
}
