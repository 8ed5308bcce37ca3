use ureq::http::Response;
use ureq::{Agent, Body};
use url::Url;

use crate::error::ClientResult;
use crate::todo::Todo;

/// The requests a workload can make against the todo service.
///
/// Each call returns the HTTP status code of the response. Deciding whether a status is acceptable
/// is left to the caller.
pub trait TodoApi {
    /// `POST /todos`
    fn create(&mut self, todo: &Todo) -> ClientResult<u16>;

    /// `PUT /todos/{id}`
    fn update(&mut self, id: u64, todo: &Todo) -> ClientResult<u16>;

    /// `DELETE /todos/{id}`
    fn delete(&mut self, id: u64) -> ClientResult<u16>;
}

/// Talks to the todo service over a single reused [Agent], so consecutive requests share one
/// kept-alive connection.
///
/// There is no timeout on requests. A service that stops responding stalls the workload.
pub struct TodoClient {
    agent: Agent,
    todos_url: Url,
}

impl TodoClient {
    /// Create a client for the service at `base_url`, such as `http://localhost:8080`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let todos_url = Url::parse(base_url)?.join("todos")?;

        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        Ok(Self { agent, todos_url })
    }

    pub fn todos_url(&self) -> &Url {
        &self.todos_url
    }

    fn todo_url(&self, id: u64) -> String {
        format!("{}/{id}", self.todos_url)
    }
}

/// Read the response body to the end so the connection is returned to the agent's pool.
fn drain(mut response: Response<Body>) -> ClientResult<u16> {
    let status = response.status().as_u16();
    response.body_mut().read_to_vec()?;
    Ok(status)
}

impl TodoApi for TodoClient {
    fn create(&mut self, todo: &Todo) -> ClientResult<u16> {
        let response = self.agent.post(self.todos_url.as_str()).send_json(todo)?;
        drain(response)
    }

    fn update(&mut self, id: u64, todo: &Todo) -> ClientResult<u16> {
        let response = self.agent.put(self.todo_url(id)).send_json(todo)?;
        drain(response)
    }

    fn delete(&mut self, id: u64) -> ClientResult<u16> {
        let response = self.agent.delete(self.todo_url(id)).call()?;
        drain(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serve one scripted status per request and report how many connections were accepted along
    /// with the request lines that were received.
    fn scripted_server(statuses: Vec<u16>) -> (String, JoinHandle<(usize, Vec<String>)>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let addr = listener.local_addr().expect("failed to get local addr");

        let handle = std::thread::spawn(move || {
            let mut connections = 0;
            let mut request_lines = Vec::new();
            let mut statuses = statuses.into_iter();

            while statuses.len() > 0 {
                let (stream, _) = listener.accept().expect("failed to accept");
                connections += 1;
                let mut writer = stream.try_clone().expect("failed to clone stream");
                let mut reader = BufReader::new(stream);

                while statuses.len() > 0 {
                    let mut request_line = String::new();
                    if reader.read_line(&mut request_line).expect("failed to read") == 0 {
                        break;
                    }
                    request_lines.push(request_line.trim_end().to_string());

                    let mut content_length = 0;
                    loop {
                        let mut header = String::new();
                        reader.read_line(&mut header).expect("failed to read header");
                        if header == "\r\n" || header.is_empty() {
                            break;
                        }
                        if let Some(value) = header.to_ascii_lowercase().strip_prefix("content-length:") {
                            content_length = value.trim().parse().expect("bad content length");
                        }
                    }
                    let mut body = vec![0; content_length];
                    reader.read_exact(&mut body).expect("failed to read body");

                    let status = statuses.next().expect("no status left");
                    let body = r#"{"id":"1"}"#;
                    write!(
                        writer,
                        "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                        body.len()
                    )
                    .expect("failed to write response");
                    writer.flush().expect("failed to flush");
                }
            }

            (connections, request_lines)
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn builds_todo_urls() {
        let client = TodoClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.todos_url().as_str(), "http://localhost:8080/todos");
        assert_eq!(client.todo_url(42), "http://localhost:8080/todos/42");
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(TodoClient::new("not a url").is_err());
    }

    #[test]
    fn reuses_one_connection_and_returns_statuses() {
        let (base_url, server) = scripted_server(vec![201, 200, 404, 200]);
        let mut client = TodoClient::new(&base_url).unwrap();
        let todo = Todo::filler(10);

        assert_eq!(client.create(&todo).unwrap(), 201);
        assert_eq!(client.update(1, &todo).unwrap(), 200);
        assert_eq!(client.update(2, &todo).unwrap(), 404);
        assert_eq!(client.delete(1).unwrap(), 200);

        let (connections, request_lines) = server.join().expect("server panicked");
        assert_eq!(connections, 1);
        assert_eq!(
            request_lines,
            vec![
                "POST /todos HTTP/1.1",
                "PUT /todos/1 HTTP/1.1",
                "PUT /todos/2 HTTP/1.1",
                "DELETE /todos/1 HTTP/1.1",
            ]
        );
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        // Bind then drop to find a port with nothing listening.
        let port = TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .map(|a| a.port())
            .unwrap();
        let mut client = TodoClient::new(&format!("http://127.0.0.1:{port}")).unwrap();

        assert!(client.delete(1).is_err());
    }
}
