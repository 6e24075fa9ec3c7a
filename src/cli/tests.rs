//! Argument parsing tests for the CLI.

#[cfg(test)]
mod cli_tests {
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["plotmgr", "--help"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["plotmgr", "find", "--plots", "plots.toml"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["plotmgr", "find"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let cli = Cli::try_parse_from(["plotmgr", "--verbose", "find", "--plots", "p.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_filter().to_string(), "debug");

        let cli = Cli::try_parse_from(["plotmgr", "-q", "find", "--plots", "p.toml"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log_filter().to_string(), "error");

        assert!(Cli::try_parse_from(["plotmgr", "-v", "-q", "find", "--plots", "p.toml"]).is_err());
    }

    #[test]
    fn test_create_arguments() {
        let cli = Cli::try_parse_from([
            "plotmgr",
            "create",
            "--plots",
            "plots.toml",
            "--inputs",
            "inputs.toml",
            "--group",
            "spectra:pp",
            "--group",
            "yields",
            "--name",
            "pt.*",
            "--mode",
            "archive",
            "--config",
            "custom.toml",
        ]);
        assert!(cli.is_ok());
        assert_eq!(cli.unwrap().config.unwrap().to_str(), Some("custom.toml"));

        let cli = Cli::try_parse_from([
            "plotmgr", "create", "--plots", "p.toml", "--inputs", "i.toml", "--mode", "zip",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_inputs_add_requires_paths() {
        let cli = Cli::try_parse_from(["plotmgr", "inputs", "add", "--file", "i.toml", "A"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["plotmgr", "inputs", "add", "--file", "i.toml", "A", "a.json", "b.csv"]);
        assert!(cli.is_ok());
    }
}
