use std::env;

#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    PrintVersion,
    InitConfig,
    RunServer,
}

pub fn parse_args() -> CliAction {
    parse_from(env::args().skip(1))
}

fn parse_from(args: impl IntoIterator<Item = String>) -> CliAction {
    let mut version_flag = false;
    let mut init_config = false;
    for arg in args {
        match arg.as_str() {
            "--version" | "-V" | "-version" => version_flag = true,
            "--init-config" => init_config = true,
            _ => {}
        }
    }
    if version_flag {
        return CliAction::PrintVersion;
    }
    if init_config {
        return CliAction::InitConfig;
    }
    CliAction::RunServer
}

pub fn print_version() {
    println!("Tunehub v{}", env!("CARGO_PKG_VERSION"));
}

pub fn init_config_file() {
    use std::fs;
    use std::path::Path;
    let target = Path::new("Tunehub.toml");
    if target.exists() || Path::new("tunehub.toml").exists() {
        eprintln!("Tunehub.toml already exists; aborting --init-config");
        return;
    }
    if let Err(e) = fs::write(target, crate::config::DEFAULT_CONFIG_TEMPLATE) {
        eprintln!("Failed to write Tunehub.toml: {e}");
    } else {
        println!("Created Tunehub.toml");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn version_wins_over_init() {
        assert_eq!(parse_from(args(&["--init-config", "-V"])), CliAction::PrintVersion);
    }

    #[test]
    fn unknown_flags_run_server() {
        assert_eq!(parse_from(args(&["--verbose"])), CliAction::RunServer);
        assert_eq!(parse_from(args(&["--init-config"])), CliAction::InitConfig);
    }
}
