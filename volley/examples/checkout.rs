use std::time::Duration;

use futures::future::join_all;
use tracing_subscriber::EnvFilter;
use volley::{
    GlobalSettings, InjectionStep, PauseType, Protocol, Session, SetUp, macros::protocol, scenario,
};

#[protocol]
struct Shop {
    base_url: String,
}

/// Needs a warm-up, so it can't use the attribute.
#[derive(Debug)]
struct Payments {
    gateway: String,
}

impl Protocol for Payments {
    fn warm_up(&self, _settings: &GlobalSettings) {
        tracing::info!("Opening a first connection to {}", self.gateway);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let browse = scenario("browse")
        .exec("home", |session| {
            session.set("page", "home");
        })
        .pause(Duration::from_millis(200))
        .exec("product", |session| {
            session.set("page", "product");
        })
        .inject([
            InjectionStep::AtOnceUsers(5),
            InjectionStep::RampUsers {
                users: 20,
                during: Duration::from_secs(10),
            },
        ])
        .unwrap()
        .uniform_pauses_percentage(25.0);

    let checkout = scenario("checkout")
        .exec("cart", |session| {
            session.set("items", 3);
        })
        .pause(Duration::from_millis(500))
        .exec("pay", |session| {
            session.remove("items");
        })
        .inject([InjectionStep::ConstantUsersPerSec {
            rate: 2.0,
            during: Duration::from_secs(30),
        }])
        .unwrap()
        .with_protocol(Payments {
            gateway: "https://payments.localhost".to_string(),
        });

    let scenarios = SetUp::new([browse, checkout])
        .protocol(Shop {
            base_url: "http://localhost:3000".to_string(),
        })
        .pauses(PauseType::Constant)
        .build()
        .unwrap();

    if let Some(shop) = scenarios[0].protocols().get::<Shop>() {
        tracing::info!("Shop resolved to {}", shop.base_url);
    }

    // The real injector would follow the profile; here each scenario runs a few users.
    for scenario in &scenarios {
        tracing::info!("{scenario:#?}");
        join_all((0..3).map(|id| scenario.entry().execute(Session::new(scenario.name(), id)))).await;
    }
}
