///  To run :
///  cargo r --example client_example
use orders_client::OrdersClient;
use orders_core::application::data_service::DataService;
use orders_core::inbound::http::{HttpServer, HttpServerConfig};
use orders_store::build_repo;
use orders_types::domain::order::Product;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("orders.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(&db_url)).await?;
    let server = HttpServer::new(
        DataService::new(repo),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = OrdersClient::new(&addr, "example@example.com")?;
    let created = client
        .create_order(vec![
            Product::named("Widget").with("qty", 1),
            Product::named("Gadget").with("color", "blue"),
        ])
        .await?;
    println!("Created order id={} for user {}", created.id, created.userid);

    let orders = client.list_orders().await?;
    println!("User has {} order(s)", orders.len());
    for order in &orders {
        let names: Vec<_> = order.products.iter().filter_map(Product::name).collect();
        println!("  #{} {:?}", order.id, names);
    }

    // Without a valid email header the server answers 422.
    let anonymous = OrdersClient::builder(&addr)?.build()?;
    match anonymous.list_orders().await {
        Ok(_) => println!("unexpected success without email"),
        Err(err) => println!("Anonymous request rejected: {err}"),
    }

    handle.abort();
    Ok(())
}
