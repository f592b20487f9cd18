#[cfg(test)]
mod tests {
    use pactium::{
        each_like, like, term, ContractManager, Error, InteractionRegistry, Matcher, MockServer,
        PactiumConfiguration, ServerState, TestSession,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn configuration(contract_dir: &tempfile::TempDir) -> PactiumConfiguration {
        let mut config = PactiumConfiguration::new("toolbar-chat-api", "unv-bcd-chat-pdr");
        config.set_contract_dir(contract_dir.path());
        config
    }

    fn http() -> reqwest::blocking::Client {
        reqwest::blocking::Client::new()
    }

    fn two_template_body() -> serde_json::Value {
        json!({
            "data": {
                "type": "ChatTemplate",
                "attributes": {
                    "templates": [
                        {
                            "id": "1",
                            "consumer": "fullserve",
                            "title": "title1",
                            "category": "category1",
                            "message": "message1",
                            "queues": ["queue1", "queue2"]
                        },
                        {
                            "id": "2",
                            "consumer": "fullserve",
                            "title": "title2",
                            "category": "category2",
                            "message": "message2",
                            "queues": ["queue3", "queue4"]
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn an_exact_request_gets_the_declared_literal_response() {
        let contract_dir = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .with_query("consumer", "fullserve")
            .will_respond_with(200)
            .with_response_header("Content-Type", "application/json")
            .with_response_body(two_template_body())
            .register()
            .unwrap();

        let response = http()
            .get(format!(
                "{}/actions/bcd/chat-template?consumer=fullserve",
                session.base_url()
            ))
            .send()
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );

        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body, two_template_body());

        session.finish().unwrap();
    }

    #[test]
    fn a_type_matched_query_accepts_undeclared_consumer_values() {
        let contract_dir = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of invalid consumer does not exist")
            .upon_receiving("A request to get chat data for an unknown consumer")
            .with_request("GET", "/actions/bcd/chat-template")
            .with_query("consumer", like(json!("fullserve")))
            .will_respond_with(200)
            .with_response_body(json!({
                "data": {
                    "type": "ChatTemplate",
                    "attributes": { "templates": [] }
                }
            }))
            .register()
            .unwrap();

        let response = http()
            .get(format!(
                "{}/actions/bcd/chat-template?consumer=invalid",
                session.base_url()
            ))
            .send()
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().unwrap();
        assert!(body["data"]["attributes"]["templates"]
            .as_array()
            .unwrap()
            .is_empty());

        session.finish().unwrap();
    }

    #[test]
    fn extra_undeclared_query_parameters_do_not_break_a_match() {
        let contract_dir = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .with_query("consumer", "fullserve")
            .will_respond_with(200)
            .register()
            .unwrap();

        let response = http()
            .get(format!(
                "{}/actions/bcd/chat-template?consumer=fullserve&debug=1",
                session.base_url()
            ))
            .send()
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        session.finish().unwrap();
    }

    #[test]
    fn a_missing_mandated_header_is_reported_as_a_mismatch() {
        let contract_dir = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("An authorized request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .with_header("Authorization", term("^Bearer .+$", "Bearer token-1").unwrap())
            .will_respond_with(200)
            .register()
            .unwrap();

        let unauthorized = http()
            .get(format!("{}/actions/bcd/chat-template", session.base_url()))
            .send()
            .unwrap();

        assert_eq!(unauthorized.status().as_u16(), 500);
        let diagnostic: serde_json::Value = unauthorized.json().unwrap();
        assert_eq!(diagnostic["error"], "NoMatchingInteraction");
        assert_eq!(diagnostic["path"], "/actions/bcd/chat-template");
        assert!(diagnostic["candidates"]
            .as_array()
            .unwrap()
            .iter()
            .any(|candidate| candidate == "An authorized request to get chat data"));

        // a mismatch never takes the server down
        let authorized = http()
            .get(format!("{}/actions/bcd/chat-template", session.base_url()))
            .header("Authorization", "Bearer some-token")
            .send()
            .unwrap();

        assert_eq!(authorized.status().as_u16(), 200);
        session.finish().unwrap();
    }

    #[test]
    fn an_unexercised_interaction_blocks_the_contract_write() {
        let contract_dir = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .will_respond_with(200)
            .register()
            .unwrap();

        session
            .given("Chat data of veripark consumer exists")
            .upon_receiving("A request that is never issued")
            .with_request("GET", "/actions/bcd/other")
            .will_respond_with(200)
            .register()
            .unwrap();

        let response = http()
            .get(format!("{}/actions/bcd/chat-template", session.base_url()))
            .send()
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        match session.finish() {
            Err(Error::IncompleteInteractions(unmatched)) => {
                assert_eq!(
                    unmatched,
                    vec![String::from(
                        "Chat data of veripark consumer exists / A request that is never issued"
                    )]
                );
            }
            other => panic!("expected IncompleteInteractions, got {:?}", other),
        }
    }

    #[test]
    fn written_contracts_reload_with_the_values_that_were_served() {
        let contract_dir = tempfile::tempdir().unwrap();
        let session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .with_query("consumer", like(json!("fullserve")))
            .will_respond_with(200)
            .with_response_header("Content-Type", "application/json")
            .with_response_body(Matcher::composite(vec![(
                "data",
                Matcher::composite(vec![
                    ("type", Matcher::from("ChatTemplate")),
                    (
                        "attributes",
                        Matcher::composite(vec![(
                            "templates",
                            each_like(like(json!({
                                "id": "1",
                                "consumer": "fullserve",
                                "title": "title1",
                                "category": "category1",
                                "message": "message1",
                                "queues": ["queue1", "queue2"]
                            }))),
                        )]),
                    ),
                ]),
            )]))
            .register()
            .unwrap();

        let response = http()
            .get(format!(
                "{}/actions/bcd/chat-template?consumer=fullserve",
                session.base_url()
            ))
            .send()
            .unwrap();
        let served: serde_json::Value = response.json().unwrap();

        let contract_path = session.finish().unwrap();
        let document = ContractManager::load_contract(&contract_path).unwrap();

        assert_eq!(document.consumer, "toolbar-chat-api");
        assert_eq!(document.provider, "unv-bcd-chat-pdr");
        assert_eq!(document.interactions.len(), 1);

        let interaction = &document.interactions[0];
        assert_eq!(interaction.request.method, "GET");
        assert_eq!(interaction.request.path, "/actions/bcd/chat-template");
        assert_eq!(
            interaction.request.query.get("consumer"),
            Some(&String::from("fullserve"))
        );
        assert_eq!(interaction.response.status, 200);
        assert_eq!(interaction.response.body.as_ref(), Some(&served));
    }

    #[test]
    fn the_first_registered_interaction_wins_over_http() {
        let contract_dir = tempfile::tempdir().unwrap();
        let mut session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("The first declared interaction")
            .with_request("GET", "/actions/bcd/chat-template")
            .will_respond_with(200)
            .register()
            .unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("The second declared interaction")
            .with_request("GET", like(json!("/actions/bcd/chat-template")))
            .will_respond_with(203)
            .register()
            .unwrap();

        let response = http()
            .get(format!("{}/actions/bcd/chat-template", session.base_url()))
            .send()
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        session.stop().unwrap();
    }

    #[test]
    fn duplicate_interaction_identities_are_rejected_at_registration() {
        let contract_dir = tempfile::tempdir().unwrap();
        let mut session = TestSession::start(configuration(&contract_dir)).unwrap();

        session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .will_respond_with(200)
            .register()
            .unwrap();

        match session
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/some/other/path")
            .will_respond_with(404)
            .register()
        {
            Err(Error::DuplicateInteraction {
                provider_state,
                description,
            }) => {
                assert_eq!(provider_state, "Chat data of fullserve consumer exists");
                assert_eq!(description, "A request to get chat data");
            }
            other => panic!("expected DuplicateInteraction, got {:?}", other),
        }

        session.stop().unwrap();
    }

    #[test]
    fn stopping_twice_is_a_no_op() {
        let registry = Arc::new(InteractionRegistry::new());
        let mut server = MockServer::new(registry);

        server.start(None).unwrap();
        assert_eq!(server.state(), ServerState::Listening);

        server.stop().unwrap();
        assert_eq!(server.state(), ServerState::Stopped);

        server.stop().unwrap();
        assert_eq!(server.state(), ServerState::Stopped);
    }

    #[test]
    fn an_occupied_port_is_a_bind_error() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let registry = Arc::new(InteractionRegistry::new());
        let mut server = MockServer::new(registry);

        match server.start(Some(port)) {
            Err(Error::BindError(_)) => {}
            other => panic!("expected BindError, got {:?}", other),
        }
        assert_eq!(server.address(), None);
    }

    #[test]
    fn parallel_sessions_are_independent() {
        let first_dir = tempfile::tempdir().unwrap();
        let second_dir = tempfile::tempdir().unwrap();

        let first = TestSession::start(configuration(&first_dir)).unwrap();
        let second = TestSession::start(configuration(&second_dir)).unwrap();
        assert_ne!(first.address(), second.address());

        first
            .given("Chat data of fullserve consumer exists")
            .upon_receiving("A request to get chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .will_respond_with(200)
            .register()
            .unwrap();

        second
            .given("Chat data of veripark consumer exists")
            .upon_receiving("A request to get veripark chat data")
            .with_request("GET", "/actions/bcd/chat-template")
            .will_respond_with(203)
            .register()
            .unwrap();

        let first_response = http()
            .get(format!("{}/actions/bcd/chat-template", first.base_url()))
            .send()
            .unwrap();
        let second_response = http()
            .get(format!("{}/actions/bcd/chat-template", second.base_url()))
            .send()
            .unwrap();

        assert_eq!(first_response.status().as_u16(), 200);
        assert_eq!(second_response.status().as_u16(), 203);

        first.finish().unwrap();
        second.finish().unwrap();
    }
}
