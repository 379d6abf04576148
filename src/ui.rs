use crate::config::{Config, RemoteFile, REQUIRED_FILES};
use crate::docker;
use crate::env::EnvFile;
use crate::error::{Result, SetupError};
use crate::fetch;
use crate::prompt::Prompter;
use crate::questionnaire::{self, Answers, Questionnaire, DEFAULT_DASHBOARD_PORT};
use crossterm::style::{style, Stylize};
use tracing::info;

const BANNER: &str = r"
  ____                    _ _
 / ___| _   _ _ __   __ _| | |_ __ ___
 \___ \| | | | '_ \ / _` | | | '_ ` _ \
  ___) | |_| | |_) | (_| | | | | | | | |
 |____/ \__,_| .__/ \__,_|_|_|_| |_| |_|
            |_|
======================================
  🚀 SupaLLM Installation Script
======================================
";

const CONFIRM_DOWNLOAD: &str = "We will download the .env and the docker-compose file in the current directory. Any file with the same name will be overridden, continue?";
const CONFIRM_CHOICES: [&str; 2] = ["Continue", "Cancel"];

const SETUP_QUESTION: &str =
    "Now we'll help you to setup your project. How do you want to continue?";
const SETUP_CHOICES: [&str; 2] = [
    "Continue with CLI (recommended)",
    "Do a custom config myself (only if you know what you're doing)",
];

const LAUNCH_QUESTION: &str = "Start SupaLLM now with docker compose?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    Completed {
        dashboard_port: String,
        launched: bool,
    },
}

/// The whole setup, top to bottom: confirm, download, configure, launch.
pub async fn run(
    cfg: &Config,
    prompter: &mut dyn Prompter,
    client: &reqwest::Client,
) -> Result<Outcome> {
    println!("{}", style(BANNER).cyan());

    if prompter.select(CONFIRM_DOWNLOAD, &CONFIRM_CHOICES)? != 0 {
        print_cancelled();
        return Ok(Outcome::Cancelled);
    }

    println!("{}", style("➡️  Downloading required files...").yellow());
    for file in &REQUIRED_FILES {
        fetch_file(client, cfg, file).await?;
    }

    let mut answers = Answers::new();
    let mut launched = false;

    if prompter.select(SETUP_QUESTION, &SETUP_CHOICES)? == 0 {
        let questionnaire = Questionnaire::for_variant(cfg.variant);
        for line in questionnaire.intro {
            println!("{}", style(line).yellow());
        }

        let env_path = cfg.env_path();
        let mut env = EnvFile::load(&env_path)?;
        answers = questionnaire::run(&questionnaire, prompter, &mut env)?;
        env.save(&env_path)?;
        info!(path = %env_path.display(), "env file written");

        if questionnaire.offers_launch && prompter.confirm(LAUNCH_QUESTION, true)? {
            launched = launch(cfg).await?;
        }
    }

    let dashboard_port = answers
        .get("FRONTEND_PORT")
        .cloned()
        .unwrap_or_else(|| DEFAULT_DASHBOARD_PORT.to_string());
    print_next_steps(cfg, &dashboard_port, launched);

    Ok(Outcome::Completed {
        dashboard_port,
        launched,
    })
}

async fn fetch_file(client: &reqwest::Client, cfg: &Config, file: &RemoteFile) -> Result<()> {
    println!("Downloading {}...", file.local);

    let url = cfg.remote_url(file);
    match fetch::download(client, &url, &cfg.local_path(file)).await {
        Ok(_) => {
            println!("✔ {} downloaded successfully.", style(file.local).green());
            Ok(())
        }
        Err(source) => {
            println!(
                "✖ {}",
                style(format!("Failed to download {}.", file.local)).red()
            );
            Err(SetupError::Download {
                dest: file.local.to_string(),
                source,
            })
        }
    }
}

/// Returns whether the stack came up cleanly.
async fn launch(cfg: &Config) -> Result<bool> {
    println!(
        "{}",
        style(format!("Running {}...", docker::compose_up_command(&cfg.docker_bin))).yellow()
    );
    let code = docker::compose_up(&cfg.docker_bin, &cfg.cwd).await?;
    if code != 0 {
        println!(
            "{}",
            style(format!("docker compose exited with code {code}.")).red()
        );
    }
    Ok(code == 0)
}

pub fn print_cancelled() {
    println!("{}", style("Operation cancelled by the user.").red());
}

fn print_next_steps(cfg: &Config, dashboard_port: &str, launched: bool) {
    let start_cmd = docker::compose_start_command(&cfg.docker_bin);
    let dashboard_url = format!("http://localhost:{dashboard_port}");

    println!("{}", style("\n🎉 Your Supallm instance is ready.").green());
    println!("------------------------------------------------");
    println!("📄 Next Steps:\n");
    if launched {
        println!("    1️⃣  Your stack is starting in the background.\n");
    } else {
        println!("    1️⃣  Start your stack with: {}\n", style(&start_cmd).cyan());
    }
    println!(
        "    2️⃣  Open the dashboard at {} 🚀\n",
        style(&dashboard_url).cyan()
    );
    if !launched {
        println!("Run {} to launch it.", style(&start_cmd).cyan());
    }
}
