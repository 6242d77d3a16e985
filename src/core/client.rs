use crate::core::errors::{Error, Result};
use crate::core::inventory::{InventoryProvider, Subnet, Vpc};
use crate::core::json;
use log::{debug, info, warn};
use std::env;
use std::process::Command;

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the client configuration.
///
/// ```
/// let client = awsnetaudit::ClientBuilder::new()
///     .aws_cli("/usr/local/bin/aws")
///     .profile("audit")
///     .region("us-east-1")
///     .build();
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
///
/// If you want to use the default configuration values, ignoring any environment variables, use
/// the [ClientBuilder::default] method to create a new [ClientBuilder] instance.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    aws_cli: String,
    profile: Option<String>,
    region: Option<String>,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with default configuration values.
    ///
    /// ```
    /// let client = awsnetaudit::ClientBuilder::default().build();
    ///
    /// assert_eq!(client.aws_cli(), "aws");
    /// assert_eq!(client.profile(), None);
    /// assert_eq!(client.region(), None);
    /// ```
    fn default() -> Self {
        Self {
            aws_cli: "aws".to_string(),
            profile: None,
            region: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set and default values when the environment
    /// variables are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `AWSNETAUDIT_AWS_CLI`
    /// - `AWSNETAUDIT_PROFILE`
    /// - `AWSNETAUDIT_REGION`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            aws_cli: get_env_var("AWSNETAUDIT_AWS_CLI", default.aws_cli),
            profile: get_optional_env_var("AWSNETAUDIT_PROFILE").or(default.profile),
            region: get_optional_env_var("AWSNETAUDIT_REGION").or(default.region),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the AWS CLI executable; defaults to `aws` (resolved through `PATH`).
    pub fn aws_cli(&mut self, aws_cli: &str) -> &mut Self {
        self.aws_cli = aws_cli.to_string();
        self
    }

    /// Set the AWS CLI named profile (`--profile`); defaults to the AWS CLI's
    /// own credential resolution.
    pub fn profile(&mut self, profile: &str) -> &mut Self {
        self.profile = Some(profile.to_string());
        self
    }

    /// Set the AWS region (`--region`); defaults to the AWS CLI's configured
    /// region.
    pub fn region(&mut self, region: &str) -> &mut Self {
        self.region = Some(region.to_string());
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Client {
        Client {
            aws_cli: self.aws_cli.clone(),
            profile: self.profile.clone(),
            region: self.region.clone(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// An [InventoryProvider] that retrieves VPCs and subnets by running the AWS CLI
/// (`aws ec2 describe-vpcs` and `aws ec2 describe-subnets`). The AWS CLI handles
/// credentials and pagination.
///
/// ```no_run
/// use awsnetaudit::InventoryProvider;
///
/// let client = awsnetaudit::Client::new();
/// let vpcs = client.vpcs().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    aws_cli: String,
    profile: Option<String>,
    region: Option<String>,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    /// Create a new [Client] with default configuration values.
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Get the AWS CLI executable.
    pub fn aws_cli(&self) -> &str {
        &self.aws_cli
    }

    /// Get the AWS CLI named profile, if set.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Get the AWS region, if set.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// Arguments for `aws ec2 <operation>` with JSON output.
    fn ec2_args(&self, operation: &str) -> Vec<String> {
        let mut args: Vec<String> = ["ec2", operation, "--output", "json"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();

        if let Some(profile) = &self.profile {
            args.extend(["--profile".to_string(), profile.clone()]);
        }
        if let Some(region) = &self.region {
            args.extend(["--region".to_string(), region.clone()]);
        }

        args
    }

    /// Run `aws ec2 <operation>` and return its standard output.
    fn run_ec2(&self, operation: &str) -> Result<String> {
        let args = self.ec2_args(operation);
        let command_line = format!("{} {}", self.aws_cli, args.join(" "));
        info!("Running: {command_line}");

        let output = Command::new(&self.aws_cli)
            .args(&args)
            .output()
            .inspect_err(|error| log::error!("Failed to run `{command_line}`: {error}"))?;

        if !output.status.success() {
            return Err(Error::AwsCli {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("`{command_line}` returned {} bytes", stdout.len());
        Ok(stdout)
    }
}

/*--------------------------------------------------------------------------------------
  Inventory Provider Implementation
--------------------------------------------------------------------------------------*/

impl InventoryProvider for Client {
    fn vpcs(&self) -> Result<Vec<Vpc>> {
        let json = self.run_ec2("describe-vpcs")?;
        let describe_vpcs = json::parse_vpcs(&json)?;
        Ok(describe_vpcs.vpcs.into_iter().map(Vpc::from).collect())
    }

    fn subnets(&self) -> Result<Vec<Subnet>> {
        let json = self.run_ec2("describe-subnets")?;
        let describe_subnets = json::parse_subnets(&json)?;
        Ok(describe_subnets
            .subnets
            .into_iter()
            .map(Subnet::from)
            .collect())
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/// Get a non-empty environment variable value.
fn get_optional_env_var(env_var: &str) -> Option<String> {
    env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .inspect(|value| info!("Using {}: {}", env_var, value))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use env::VarError;

    /*-------------------------------------------------------------------------
      Test Environment Variable Configuration
    -------------------------------------------------------------------------*/

    /// ENV_VAR: AWSNETAUDIT_AWS_CLI
    /// ENV_VAR: AWSNETAUDIT_PROFILE
    /// ENV_VAR: AWSNETAUDIT_REGION
    #[test]
    fn test_environment_variable_configuration() {
        let test_env_vars = [
            ("AWSNETAUDIT_AWS_CLI", "/opt/aws/bin/aws"),
            ("AWSNETAUDIT_PROFILE", "audit"),
            ("AWSNETAUDIT_REGION", "eu-west-1"),
        ];

        let default = Client::default();

        // Store environment variable values
        let stored_env_vars: Vec<(String, std::result::Result<String, VarError>)> = test_env_vars
            .iter()
            .map(|(env_var, _)| (env_var.to_string(), env::var(env_var)))
            .collect();

        // Unset all environment variables
        test_env_vars.iter().for_each(|(env_var, _)| unsafe {
            std::env::remove_var(env_var);
        });

        // Test default cases
        let new = Client::new();
        assert_eq!(new.aws_cli(), default.aws_cli());
        assert_eq!(new.profile(), default.profile());
        assert_eq!(new.region(), default.region());

        // Set all environment variables
        for (env_var, value) in test_env_vars.iter() {
            unsafe { std::env::set_var(env_var, value) };
        }

        // Test environment variable configuration
        let env_config = Client::new();
        assert_eq!(env_config.aws_cli(), "/opt/aws/bin/aws");
        assert_eq!(env_config.profile(), Some("audit"));
        assert_eq!(env_config.region(), Some("eu-west-1"));

        // Reset environment variables
        for (env_var, value) in stored_env_vars {
            match value {
                Ok(value) => unsafe { std::env::set_var(env_var, value) },
                Err(VarError::NotPresent) => unsafe { std::env::remove_var(env_var) },
                Err(VarError::NotUnicode(value)) => unsafe { std::env::set_var(env_var, value) },
            }
        }
    }

    /*-------------------------------------------------------------------------
      Test Getter and Setter Methods
    -------------------------------------------------------------------------*/

    #[test]
    fn test_getter_and_setter_methods() {
        let client = ClientBuilder::default()
            .aws_cli("/opt/aws/bin/aws")
            .profile("audit")
            .region("eu-west-1")
            .build();

        assert_eq!(client.aws_cli(), "/opt/aws/bin/aws");
        assert_eq!(client.profile(), Some("audit"));
        assert_eq!(client.region(), Some("eu-west-1"));
    }

    /*-------------------------------------------------------------------------
      Test AWS CLI Invocation
    -------------------------------------------------------------------------*/

    #[test]
    fn test_ec2_args() {
        let client = ClientBuilder::default().build();
        assert_eq!(
            client.ec2_args("describe-vpcs"),
            vec!["ec2", "describe-vpcs", "--output", "json"]
        );

        let client = ClientBuilder::default()
            .profile("audit")
            .region("eu-west-1")
            .build();
        assert_eq!(
            client.ec2_args("describe-subnets"),
            vec![
                "ec2",
                "describe-subnets",
                "--output",
                "json",
                "--profile",
                "audit",
                "--region",
                "eu-west-1"
            ]
        );
    }

    #[test]
    fn test_missing_aws_cli() {
        let client = ClientBuilder::default()
            .aws_cli("./scratch/no-such-aws-cli")
            .build();
        assert!(matches!(client.vpcs(), Err(Error::Io(_))));
    }

    #[test]
    fn test_aws_cli_failure() {
        let client = ClientBuilder::default().aws_cli("false").build();

        match client.vpcs() {
            Err(Error::AwsCli {
                command, status, ..
            }) => {
                assert_eq!(command, "false ec2 describe-vpcs --output json");
                assert!(status.contains('1'), "unexpected status: {status}");
            }
            other => panic!("expected an AWS CLI error, got {other:?}"),
        }

        assert!(matches!(client.subnets(), Err(Error::AwsCli { .. })));
    }
}
