//! HTTP ingestion scenarios

#[cfg(test)]
mod tests {
    use crate::common::TestCollector;
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use metrics_relay::core::metrics::Metric;
    use metrics_relay::core::model::WireRecord;
    use metrics_relay::core::signer::Signer;
    use metrics_relay::server::HttpServer;
    use metrics_relay::storage::MetricsStorage;

    #[actix_web::test]
    async fn test_counter_scenario() {
        let collector = TestCollector::file_backed(300).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        for uri in ["/update/counter/requests/5", "/update/counter/requests/3"] {
            let req = test::TestRequest::post().uri(uri).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/value/counter/requests")
            .to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "8");
    }

    #[actix_web::test]
    async fn test_gauge_scenario() {
        let collector = TestCollector::file_backed(300).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        for uri in ["/update/gauge/temp/36.6", "/update/gauge/temp/37.1"] {
            let req = test::TestRequest::post().uri(uri).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get().uri("/value/gauge/temp").to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "37.1");
    }

    #[actix_web::test]
    async fn test_unknown_type_batch_scenario() {
        let collector = TestCollector::file_backed(300).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        let req = test::TestRequest::post()
            .uri("/updates/")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"[{"id":"x","type":"bogus"}]"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);

        let snapshot = crate::assert_ok!(collector.storage.get_metric_values().await);
        assert!(snapshot.is_empty());
    }

    #[actix_web::test]
    async fn test_forged_hash_scenario() {
        let collector = TestCollector::file_backed(0).await.with_key("secret");
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        let signer = Signer::new("secret").unwrap();
        let genuine = signer.sign_hex(&Metric::gauge("temp", 36.6)).unwrap();
        let req = test::TestRequest::post()
            .uri("/update/")
            .set_json(WireRecord::gauge("temp", 36.6).with_hash(genuine))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // signature of another value
        let forged = signer.sign_hex(&Metric::gauge("temp", 1.0)).unwrap();
        let req = test::TestRequest::post()
            .uri("/update/")
            .set_json(WireRecord::gauge("temp", 99.9).with_hash(forged))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let metric = crate::assert_ok!(collector.storage.get_metric("gauge", "temp").await);
        assert_eq!(metric.value(), 36.6);

        // the write-through backup never saw the rejected value
        let backup = crate::assert_ok!(collector.storage.backup().get_metric_values().await);
        assert_eq!(backup["gauge"]["temp"], "36.6");
    }

    #[actix_web::test]
    async fn test_unsigned_records_accepted_with_key() {
        let collector = TestCollector::file_backed(300).await.with_key("secret");
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        let req = test::TestRequest::post()
            .uri("/updates/")
            .set_json(vec![WireRecord::counter("c", 4)])
            .to_request();
        let records: Vec<WireRecord> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(records[0].delta, Some(4));
        assert!(records[0].hash.is_some());
    }

    #[actix_web::test]
    async fn test_gzip_request_body() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let collector = TestCollector::file_backed(300).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        let body = serde_json::to_vec(&vec![WireRecord::gauge("g", 2.5)]).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&body).unwrap();
        let compressed = encoder.finish().unwrap();

        let req = test::TestRequest::post()
            .uri("/updates/")
            .insert_header(("content-type", "application/json"))
            .insert_header(("content-encoding", "gzip"))
            .set_payload(compressed)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let metric = crate::assert_ok!(collector.storage.get_metric("gauge", "g").await);
        assert_eq!(metric.value(), 2.5);
    }

    #[actix_web::test]
    async fn test_ping_with_database() {
        let collector = TestCollector::database_backed().await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(
            collector.state.clone(),
        )))
        .await;

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "ok");
    }
}
