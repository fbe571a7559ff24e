use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "llm-profile",
    version,
    about = "Benchmark LLM response quality and latency over repeated trials"
)]
pub struct CliArgs {
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a user and store provider API keys
    Signup(SignupArgs),
    /// Run a benchmark
    Run(Box<RunArgs>),
    /// List known models per provider
    Models {
        #[arg(long, short = 'p')]
        provider: Option<String>,
    },
    /// Write a config file populated with defaults
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long, short = 'u')]
    pub user: String,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub openai_key: Option<String>,
    #[arg(long)]
    pub anthropic_key: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Log in as this user to use their stored API keys
    #[arg(long, short = 'u')]
    pub user: Option<String>,
    #[arg(long)]
    pub password: Option<String>,

    #[arg(long, short = 'p')]
    pub provider: Option<String>,
    #[arg(long, short = 'm')]
    pub model: Option<String>,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long)]
    pub temperature: Option<f32>,
    #[arg(long)]
    pub max_tokens: Option<u32>,
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, conflicts_with = "prompt_file")]
    pub prompt: Option<String>,
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,
    #[arg(long, short = 'n')]
    pub trials: Option<usize>,
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// `string_match` or `entity_recognition`
    #[arg(long)]
    pub task_type: Option<String>,
    #[arg(long, conflicts_with = "expected_file")]
    pub expected: Option<String>,
    #[arg(long)]
    pub expected_file: Option<PathBuf>,
    /// `algorithmic` or `llm_judge`
    #[arg(long)]
    pub method: Option<String>,

    #[arg(long)]
    pub judge_provider: Option<String>,
    #[arg(long)]
    pub judge_model: Option<String>,
    /// Use this key for the judge instead of a stored one
    #[arg(long)]
    pub judge_api_key: Option<String>,
    #[arg(long)]
    pub judge_prompt_file: Option<PathBuf>,
    /// Store `--judge-api-key` as the user's evaluator key
    #[arg(long, requires = "judge_api_key")]
    pub save_judge_key: bool,

    #[arg(long)]
    pub csv: Option<PathBuf>,
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse() {
        let args = CliArgs::try_parse_from([
            "llm-profile",
            "run",
            "--user",
            "alice",
            "-p",
            "anthropic",
            "--prompt",
            "hi",
            "-n",
            "10",
            "--method",
            "llm_judge",
            "--judge-api-key",
            "sk",
            "--save-judge-key",
        ])
        .unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.user.as_deref(), Some("alice"));
        assert_eq!(run.trials, Some(10));
        assert!(run.save_judge_key);
    }

    #[test]
    fn save_judge_key_requires_a_key() {
        assert!(CliArgs::try_parse_from(["llm-profile", "run", "--save-judge-key"]).is_err());
    }

    #[test]
    fn prompt_sources_conflict() {
        assert!(CliArgs::try_parse_from([
            "llm-profile",
            "run",
            "--prompt",
            "a",
            "--prompt-file",
            "b.txt"
        ])
        .is_err());
    }
}
