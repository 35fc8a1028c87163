//! Command line surface of the runner.

use clap::{Args, Parser, Subcommand};
use tierfolio_core::profile::UserRiskProfile;
use tierfolio_core::PortfolioRequest;

/// Risk-tiered market snapshots and portfolio drafts.
#[derive(Debug, Parser)]
#[command(name = "tierfolio", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one market analysis and store the snapshot.
    Analyze,
    /// Run market analysis after the initial delay, then on a fixed interval.
    Schedule,
    /// Generate a portfolio from stored or inline questionnaire answers.
    Portfolio(PortfolioArgs),
    /// Store questionnaire answers for an owner.
    Answers {
        #[arg(long)]
        owner: String,
        /// Four grades between 0 and 4.
        #[arg(num_args = 4, required = true)]
        grades: Vec<i64>,
    },
    /// Show or delete an owner's draft portfolio.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PortfolioArgs {
    /// Use the answers stored for this owner and save the result as their draft.
    #[arg(long)]
    pub owner: Option<String>,
    /// Four comma-separated grades, e.g. `1,2,0,4`.
    #[arg(long, value_delimiter = ',')]
    pub answers: Option<Vec<i64>>,
}

impl PortfolioArgs {
    pub fn into_request(self) -> anyhow::Result<PortfolioRequest> {
        match (self.owner, self.answers) {
            (Some(owner), _) => Ok(PortfolioRequest::Owner(owner)),
            (None, Some(grades)) => Ok(PortfolioRequest::Profile(UserRiskProfile::new(&grades)?)),
            (None, None) => anyhow::bail!("either --owner or --answers is required"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DraftAction {
    Show {
        #[arg(long)]
        owner: String,
    },
    Delete {
        #[arg(long)]
        owner: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_with_inline_answers() {
        let cli = Cli::try_parse_from(["tierfolio", "portfolio", "--answers", "1,2,0,4"]).unwrap();
        let Command::Portfolio(args) = cli.command else {
            panic!("expected portfolio command");
        };
        let request = args.into_request().unwrap();
        assert_eq!(
            request,
            PortfolioRequest::Profile(UserRiskProfile::new(&[1, 2, 0, 4]).unwrap())
        );
    }

    #[test]
    fn test_portfolio_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["tierfolio", "portfolio"]).is_err());
        assert!(Cli::try_parse_from([
            "tierfolio", "portfolio", "--owner", "alice", "--answers", "1,1,1,1"
        ])
        .is_err());
    }

    #[test]
    fn test_out_of_range_inline_answers_are_rejected() {
        let cli = Cli::try_parse_from(["tierfolio", "portfolio", "--answers", "1,2,7,4"]).unwrap();
        let Command::Portfolio(args) = cli.command else {
            panic!("expected portfolio command");
        };
        assert!(args.into_request().is_err());
    }

    #[test]
    fn test_answers_take_four_grades() {
        let cli =
            Cli::try_parse_from(["tierfolio", "answers", "--owner", "bob", "3", "2", "1", "0"])
                .unwrap();
        match cli.command {
            Command::Answers { owner, grades } => {
                assert_eq!(owner, "bob");
                assert_eq!(grades, vec![3, 2, 1, 0]);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["tierfolio", "answers", "--owner", "bob", "3"]).is_err());
    }
}
