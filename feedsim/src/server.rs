use log::info;
use scopecore::feed::record::FeedDocument;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
    time::Duration,
};
use tokio::runtime::Builder;
use warp::Filter;

use crate::scenario::ScenarioConfig;
use crate::traffic::TrafficModel;

/// Hosts `/data/aircraft.json` and keeps the advertised document moving.
///
/// One thread advances the traffic model on the scenario interval and
/// publishes a fresh document wholesale; another runs the warp server on a
/// dedicated runtime. Readers only ever see a complete document.
pub struct FeedServer {
    state: Arc<RwLock<FeedDocument>>,
}

impl FeedServer {
    pub fn start(port: u16, scenario: ScenarioConfig) -> Self {
        let state = Arc::new(RwLock::new(FeedDocument::default()));

        let updater_state = state.clone();
        let updater_scenario = scenario.clone();
        thread::spawn(move || {
            let mut model = TrafficModel::new(&updater_scenario);
            let dt = Duration::from_secs(updater_scenario.update_interval_secs.max(1));
            loop {
                model.advance(dt);
                *updater_state.write().unwrap() = model.document();
                thread::sleep(dt);
            }
        });

        let serve_state = state.clone();
        thread::spawn(move || {
            let state_filter = warp::any().map(move || serve_state.clone());
            let route = warp::path!("data" / "aircraft.json")
                .and(warp::get())
                .and(state_filter)
                .map(|state: Arc<RwLock<FeedDocument>>| {
                    warp::reply::json(&*state.read().unwrap())
                });

            let address = SocketAddr::from(([127, 0, 0, 1], port));
            info!("serving synthetic feed on http://{address}/data/aircraft.json");
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build feed server runtime");
            runtime.block_on(async move {
                warp::serve(route).run(address).await;
            });
        });

        Self { state }
    }

    /// Most recently published document.
    pub fn snapshot(&self) -> FeedDocument {
        self.state.read().unwrap().clone()
    }
}
