//! Tests for the Mistral chat-completions client against a local stub server

#[cfg(test)]
mod tests {
    use fractal_observer::ObserverError;
    use fractal_observer::io::configuration::DEFAULT_ORACLE_MODEL;
    use fractal_observer::oracle::{ExplanationOracle, MistralOracle};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    // Serves one canned response and hands back the raw request
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
            panic!("bind local port");
        };
        let Ok(address) = listener.local_addr() else {
            panic!("local address");
        };

        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return String::new();
            };
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0_usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                request.push_str(&line);
            }
            let mut payload = vec![0_u8; content_length];
            let _ = reader.read_exact(&mut payload);
            request.push_str(&String::from_utf8_lossy(&payload));

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            request
        });

        (format!("http://{address}/v1/chat/completions"), handle)
    }

    fn oracle(endpoint: &str) -> MistralOracle {
        let Ok(oracle) = MistralOracle::new("test-key", "test-model") else {
            panic!("client should build");
        };
        oracle.with_endpoint(endpoint)
    }

    // Tests the configured model is kept
    // Verified by defaulting the model inside the client
    #[test]
    fn test_model() {
        let Ok(client) = MistralOracle::new("key", DEFAULT_ORACLE_MODEL) else {
            panic!("client should build");
        };
        assert_eq!(client.model(), DEFAULT_ORACLE_MODEL);
    }

    // Tests a successful reply is parsed and unfenced
    // Verified by returning the whole response body
    #[test]
    fn test_complete_success() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"```markdown\nThree half-size copies.\n```"}}]}"#,
        );
        let result = oracle(&endpoint).complete("why?");
        let request = server.join().unwrap_or_default();

        let Ok(text) = result else {
            panic!("completion should succeed");
        };
        assert_eq!(text, "Three half-size copies.");
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer test-key"));
        assert!(request.contains("\"model\":\"test-model\""));
        assert!(request.contains("\"content\":\"why?\""));
    }

    // Tests non-success statuses are oracle failures
    // Verified by parsing the error body as a reply
    #[test]
    fn test_complete_http_error() {
        let (endpoint, server) = serve_once("401 Unauthorized", r#"{"message":"bad key"}"#);
        let result = oracle(&endpoint).complete("why?");
        let _ = server.join();
        assert!(matches!(result, Err(ObserverError::Oracle { reason }) if reason.contains("401")));
    }

    // Tests replies without choices are oracle failures
    // Verified by returning an empty explanation
    #[test]
    fn test_complete_no_choices() {
        let (endpoint, server) = serve_once("200 OK", r#"{"choices":[]}"#);
        let result = oracle(&endpoint).complete("why?");
        let _ = server.join();
        assert!(matches!(result, Err(ObserverError::Oracle { .. })));
    }

    // Tests unreachable endpoints are oracle failures
    // Verified by retrying forever
    #[test]
    fn test_unreachable_endpoint() {
        let endpoint = {
            let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
                panic!("bind local port");
            };
            let Ok(address) = listener.local_addr() else {
                panic!("local address");
            };
            format!("http://{address}/v1/chat/completions")
        };
        let result = oracle(&endpoint).complete("why?");
        assert!(matches!(result, Err(ObserverError::Oracle { .. })));
    }
}
