use clap::{Parser, Subcommand};
use serde_json::Value;
use uuid::Uuid;

use service_broker::http::request::{BindDetails, BindResource, PlanQuery, ProvisionDetails};

#[derive(Parser)]
#[command(name = "broker-cli")]
#[command(about = "Client for the service broker API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "BROKER_URL", default_value = "http://localhost:3000")]
    url: String,

    #[arg(long, env = "AUTH_USER")]
    user: String,

    #[arg(long, env = "AUTH_PASS", hide_env_values = true)]
    pass: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the service catalog
    Catalog,
    /// Provision a service instance
    Provision {
        #[arg(long)]
        instance_id: Option<String>,
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        plan_id: String,
        #[arg(long, default_value = "")]
        organization_guid: String,
        #[arg(long, default_value = "")]
        space_guid: String,
        /// Raw JSON parameters
        #[arg(long)]
        parameters: Option<String>,
    },
    /// Deprovision a service instance
    Deprovision {
        #[arg(long)]
        instance_id: String,
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        plan_id: String,
    },
    /// Bind an application to a service instance
    Bind {
        #[arg(long)]
        instance_id: String,
        #[arg(long)]
        binding_id: Option<String>,
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        plan_id: String,
        #[arg(long)]
        app_guid: Option<String>,
    },
    /// Remove a binding
    Unbind {
        #[arg(long)]
        instance_id: String,
        #[arg(long)]
        binding_id: String,
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        plan_id: String,
    },
}

fn instances_url(base: &str, instance_id: &str) -> String {
    format!("{}/v2/service_instances/{}", base.trim_end_matches('/'), instance_id)
}

fn bindings_url(base: &str, instance_id: &str, binding_id: &str) -> String {
    format!(
        "{}/service_bindings/{}",
        instances_url(base, instance_id),
        binding_id
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::Catalog => {
            client.get(format!("{}/v2/catalog", cli.url.trim_end_matches('/')))
        }
        Commands::Provision {
            instance_id,
            service_id,
            plan_id,
            organization_guid,
            space_guid,
            parameters,
        } => {
            let instance_id = instance_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let parameters = parameters
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()?;
            eprintln!("instance_id: {}", instance_id);
            client
                .put(instances_url(&cli.url, &instance_id))
                .json(&ProvisionDetails {
                    service_id,
                    plan_id,
                    organization_guid,
                    space_guid,
                    parameters,
                })
        }
        Commands::Deprovision {
            instance_id,
            service_id,
            plan_id,
        } => client
            .delete(instances_url(&cli.url, &instance_id))
            .query(&PlanQuery {
                service_id,
                plan_id,
            }),
        Commands::Bind {
            instance_id,
            binding_id,
            service_id,
            plan_id,
            app_guid,
        } => {
            let binding_id = binding_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            eprintln!("binding_id: {}", binding_id);
            client
                .put(bindings_url(&cli.url, &instance_id, &binding_id))
                .json(&BindDetails {
                    service_id,
                    plan_id,
                    bind_resource: app_guid.map(|guid| BindResource {
                        app_guid: Some(guid),
                        route: None,
                    }),
                    ..Default::default()
                })
        }
        Commands::Unbind {
            instance_id,
            binding_id,
            service_id,
            plan_id,
        } => client
            .delete(bindings_url(&cli.url, &instance_id, &binding_id))
            .query(&PlanQuery {
                service_id,
                plan_id,
            }),
    };

    let res = request.basic_auth(&cli.user, Some(&cli.pass)).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("broker returned status {}", status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
