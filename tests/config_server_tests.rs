// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the config server client.
//!
//! A minimal HTTP server on a background thread stands in for the real
//! config server, so these tests need no network access beyond loopback.

#![cfg(feature = "remote")]

use bootcfg::adapters::{ConfigServerAdapter, ConfigServerOptions};
use bootcfg::prelude::*;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

const ENVIRONMENT: &str = r#"{
  "name": "config-client",
  "profiles": ["default"],
  "label": null,
  "version": "2f1c3b",
  "propertySources": [
    {
      "name": "https://github.com/example/config-repo/config-client.properties",
      "source": {
        "message-from-config-server": "Hello from the config server!",
        "server.port": 8081
      }
    },
    {
      "name": "https://github.com/example/config-repo/application.yml",
      "source": {
        "message-from-config-server": "shadowed",
        "shared.timeout": "30s"
      }
    }
  ]
}"#;

/// Serves one canned response per expected request and reports each
/// request line on the returned channel.
fn serve(status: &'static str, body: &'static str, requests: usize) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let _ = tx.send(request_line.trim_end().to_string());

            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        }
    });

    (uri, rx)
}

#[tokio::test]
async fn test_fetch_async() {
    let (uri, requests) = serve("200 OK", ENVIRONMENT, 1);
    let options = ConfigServerOptions::new(uri, "config-client").with_profiles(["dev", "db"]);

    let adapter = ConfigServerAdapter::fetch(&options).await.unwrap();

    assert_eq!(requests.recv().unwrap(), "GET /config-client/dev,db HTTP/1.1");
    assert_eq!(adapter.property_sources().len(), 2);
    assert_eq!(
        adapter
            .get_str("message-from-config-server")
            .unwrap()
            .unwrap()
            .as_str(),
        "Hello from the config server!"
    );
    assert_eq!(adapter.get_str("server.port").unwrap().unwrap().as_str(), "8081");
    assert_eq!(adapter.get_str("shared.timeout").unwrap().unwrap().as_str(), "30s");
}

#[tokio::test]
async fn test_fetch_not_found_is_source_error() {
    let (uri, _requests) = serve("404 Not Found", "{}", 1);
    let options = ConfigServerOptions::new(uri, "missing-app");

    let result = ConfigServerAdapter::fetch(&options).await;
    assert!(matches!(
        result,
        Err(ConfigError::SourceError { ref source_name, .. }) if source_name == "configserver"
    ));
}

#[tokio::test]
async fn test_fetch_invalid_body_is_parse_error() {
    let (uri, _requests) = serve("200 OK", "<html>not json</html>", 1);
    let options = ConfigServerOptions::new(uri, "config-client");

    let result = ConfigServerAdapter::fetch(&options).await;
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_fetch_blocking_with_label() {
    let (uri, requests) = serve("200 OK", ENVIRONMENT, 1);
    let options = ConfigServerOptions::new(uri, "config-client").with_label("feature/x");

    let adapter = ConfigServerAdapter::fetch_blocking(&options).unwrap();

    assert_eq!(
        requests.recv().unwrap(),
        "GET /config-client/default/feature(_)x HTTP/1.1"
    );
    assert_eq!(adapter.name(), "configserver");
}

#[test]
fn test_remote_source_in_resolver() {
    let (uri, _requests) = serve("200 OK", ENVIRONMENT, 1);
    let options = ConfigServerOptions::new(uri, "config-client");
    let remote = ConfigServerAdapter::fetch_blocking(&options).unwrap();

    let resolver = ConfigResolver::builder()
        .with_values("defaults", [("server.port", "8080"), ("other", "local")])
        .with_source(Box::new(remote))
        .build()
        .unwrap();

    assert_eq!(resolver.source_names(), vec!["configserver", "defaults"]);
    assert_eq!(resolver.expand("${server.port}/${other}").unwrap(), "8081/local");
}

#[cfg(feature = "tutorials")]
mod tutorials {
    use super::*;
    use bootcfg::adapters::MemorySink;
    use bootcfg::tutorials::{Tutorial, TutorialContext};

    #[test]
    fn test_config_client_tutorial() {
        let (uri, requests) = serve("200 OK", ENVIRONMENT, 1);
        let context = TutorialContext {
            config_server: Some(uri),
            ..TutorialContext::new().with_overrides(["--spring.application.name=config-client"])
        };
        let sink = MemorySink::new();

        Tutorial::ConfigClient.run(&context, &sink).unwrap();

        assert_eq!(requests.recv().unwrap(), "GET /config-client/default HTTP/1.1");
        assert_eq!(
            sink.lines(),
            vec!["message from the Spring Cloud Config Server: Hello from the config server!"]
        );
    }

    #[test]
    fn test_config_client_overrides_beat_remote() {
        let (uri, _requests) = serve("200 OK", ENVIRONMENT, 1);
        let context = TutorialContext {
            config_server: Some(uri),
            ..TutorialContext::new().with_overrides(["--message-from-config-server=from cli"])
        };
        let sink = MemorySink::new();

        Tutorial::ConfigClient.run(&context, &sink).unwrap();
        assert_eq!(
            sink.lines(),
            vec!["message from the Spring Cloud Config Server: from cli"]
        );
    }

    #[test]
    fn test_config_client_unreachable_server_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let context = TutorialContext {
            config_server: Some(uri),
            ..TutorialContext::new()
        };
        let sink = MemorySink::new();

        let result = Tutorial::ConfigClient.run(&context, &sink);
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
        assert!(sink.lines().is_empty());
    }
}
