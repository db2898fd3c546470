use super::{
    Api, CacheNaming, Config, Logs, Origin, Precache, PrecachePolicy, Push, WorkerBox, TEST,
};
use std::time::Duration;

/// Creates a new test configuration.
pub fn new_test_config() -> Config {
    Config {
        worker: WorkerBox {
            env: TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            api: Some(Api {
                name: Some("offcache".to_string()),
                port: Some("8030".to_string()),
                timeout: Some(Duration::from_secs(5)),
            }),
            scope: "https://apps.example.com/mastery/".to_string(),
            cache: CacheNaming {
                prefix: "mastery-assets-".to_string(),
                version: "v3".to_string(),
                storage: None,
            },
            precache: Precache {
                assets: vec![
                    "".to_string(),
                    "index.html".to_string(),
                    "manifest.json".to_string(),
                    "icon-192x192.png".to_string(),
                    "icon-512x512.png".to_string(),
                ],
                policy: Some(PrecachePolicy::FailOpen),
                shell: Some("index.html".to_string()),
                skip_waiting: Some(true),
            },
            origin: Some(Origin {
                timeout: Some(Duration::from_secs(5)),
            }),
            push: Some(Push {
                title: Some("Daily practice".to_string()),
                body: Some("Time for today's study session.".to_string()),
                icon: Some("icon-192x192.png".to_string()),
                badge: None,
            }),
        },
    }
}
