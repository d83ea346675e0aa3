//! A scripted HTTP/1.1 server on localhost for tests that drive the client's request loops.
//!
//! Every response closes its connection, so each request is accepted and answered in order.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub(super) struct TestServer {
	listener: Option<tokio::net::TcpListener>,
	addr: std::net::SocketAddr,
	requests: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl TestServer {
	pub(super) async fn bind() -> Self {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		TestServer {
			listener: Some(listener),
			addr,
			requests: Default::default(),
		}
	}

	pub(super) fn url(&self, path_and_query: &str) -> http_common::Uri {
		format!("http://{}{path_and_query}", self.addr).parse().unwrap()
	}

	/// Answers the next `responses.len()` requests with `responses`, in order.
	pub(super) fn serve(&mut self, responses: Vec<TestResponse>) {
		let listener = self.listener.take().expect("server is already serving");
		let requests = self.requests.clone();

		tokio::spawn(async move {
			for response in responses {
				let (mut stream, _) = listener.accept().await.unwrap();
				let request = read_request(&mut stream).await;
				requests.lock().unwrap().push(request);
				stream.write_all(&response.to_bytes()).await.unwrap();
				stream.shutdown().await.unwrap();
			}
		});
	}

	/// The `"{method} {path}"` of every request received so far.
	pub(super) fn requests(&self) -> Vec<String> {
		self.requests.lock().unwrap().clone()
	}
}

pub(super) struct TestResponse {
	status: http_common::StatusCode,
	headers: Vec<(&'static str, String)>,
	body: Option<String>,
}

impl TestResponse {
	pub(super) fn new(status: http_common::StatusCode) -> Self {
		TestResponse {
			status,
			headers: vec![],
			body: None,
		}
	}

	pub(super) fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));
		self
	}

	pub(super) fn json(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body.to_string());
		self
	}

	fn to_bytes(&self) -> Vec<u8> {
		let mut response = format!(
			"HTTP/1.1 {} {}\r\nconnection: close\r\n",
			self.status.as_u16(),
			self.status.canonical_reason().unwrap_or(""),
		);
		for (name, value) in &self.headers {
			response.push_str(&format!("{name}: {value}\r\n"));
		}
		match &self.body {
			Some(body) => response.push_str(&format!("content-type: application/json\r\ncontent-length: {}\r\n\r\n{body}", body.len())),
			None => response.push_str("content-length: 0\r\n\r\n"),
		}
		response.into_bytes()
	}
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
	let mut buf: Vec<u8> = vec![];
	let mut chunk = [0_u8; 1024];

	let head_len = loop {
		if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
			break pos + 4;
		}
		let read = stream.read(&mut chunk).await.unwrap();
		assert_ne!(read, 0, "connection closed before the request head was read");
		buf.extend_from_slice(&chunk[..read]);
	};

	let head = std::str::from_utf8(&buf[..head_len]).unwrap().to_owned();

	let content_length =
		head.lines()
		.filter_map(|line| line.split_once(':'))
		.find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
		.map_or(0, |(_, value)| value.trim().parse().unwrap());
	while buf.len() < head_len + content_length {
		let read = stream.read(&mut chunk).await.unwrap();
		assert_ne!(read, 0, "connection closed before the request body was read");
		buf.extend_from_slice(&chunk[..read]);
	}

	let mut request_line = head.lines().next().unwrap().split(' ');
	let method = request_line.next().unwrap();
	let target = request_line.next().unwrap();
	let path = target.split('?').next().unwrap();
	format!("{method} {path}")
}
