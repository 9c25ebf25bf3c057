//! Sheet export client against a one-shot local HTTP server.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use histo_ingest::{IngestError, SheetExportClient};
use histo_model::{DatasetDefinition, DatasetSpec};

/// Serves a single response and reports the request line it received.
fn serve_once(status: &str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let status = status.to_string();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).expect("header") == 0 || line == "\r\n" {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
        let _ = tx.send(request_line.trim().to_string());
    });
    (format!("http://{addr}/spreadsheets/d/doc"), rx)
}

fn definition(custom_header: bool, header: &[&str]) -> DatasetDefinition {
    DatasetDefinition::new(
        "Economy",
        "gdp",
        DatasetSpec {
            columns: Some("A:C".to_string()),
            custom_header,
            header: header.iter().map(|h| (*h).to_string()).collect(),
        },
    )
}

#[test]
fn fetches_sheet_range_as_dataframe() {
    let (base, requests) = serve_once("200 OK", "Country,1950,1960\nItaly,12,14\nFrance,15,18\n");
    let client = SheetExportClient::new(base, None).expect("client");

    let df = client.fetch(&definition(false, &[])).expect("fetch");

    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 3);
    let request = requests.recv().expect("request");
    assert_eq!(
        request,
        "GET /spreadsheets/d/doc/gviz/tq?tqx=out%3Acsv&sheet=Economy&range=A%3AC HTTP/1.1"
    );
}

#[test]
fn custom_header_is_applied_after_fetch() {
    let (base, _requests) = serve_once("200 OK", "A,B,C\nItaly,12,14\n");
    let client = SheetExportClient::new(base, None).expect("client");

    let df = client
        .fetch(&definition(true, &["Country", "1950", "1960"]))
        .expect("fetch");

    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names, vec!["Country", "1950", "1960"]);
}

#[test]
fn short_custom_header_is_rejected() {
    let (base, _requests) = serve_once("200 OK", "A,B,C,D\n1,2,3,4\n");
    let client = SheetExportClient::new(base, None).expect("client");

    let result = client.fetch(&definition(true, &["Country", "1950", "1960"]));

    assert!(matches!(
        result,
        Err(IngestError::HeaderMismatch {
            declared: 3,
            fetched: 4,
            ..
        })
    ));
}

#[test]
fn error_status_is_reported() {
    let (base, _requests) = serve_once("404 Not Found", "no such sheet");
    let client = SheetExportClient::new(base, None).expect("client");

    let result = client.fetch(&definition(false, &[]));

    assert!(matches!(
        result,
        Err(IngestError::HttpStatus { status: 404, message, .. }) if message == "no such sheet"
    ));
}
