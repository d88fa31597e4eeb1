use actix_web::{http::StatusCode, test, App};
use dlx_sudoku::controller::{solve, Entry, ErrorResponse, Response};

/// Sends a batch of valid puzzles to `/solve` and checks every returned grid satisfies
/// the default Sudoku constraints.
#[actix_web::test]
async fn test_valid_batch_solves_and_satisfies_constraints() {
    let app = test::init_service(App::new().service(solve)).await;

    let payload = create_payload(vec![
        ".".repeat(81),
        "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..".to_owned(),
    ]);

    let req = test::TestRequest::post()
        .uri("/solve")
        .set_json(payload)
        .to_request();
    let res: Response = test::call_and_read_body_json(&app, req).await;

    for sudoku in res.data {
        assert!(dlx_sudoku::constraint::check_default_constraints(&sudoku.grid, None).unwrap());
    }
}

/// Sends a syntactically malformed grid (bad characters, then wrong length) to test the
/// regex validators at the HTTP boundary.
#[actix_web::test]
async fn test_malformed_data_returns_bad_request() {
    let app = test::init_service(App::new().service(solve)).await;

    let malformed = vec![
        "00080905160020000C30000000001000003008A90000000000040040003060B000051000000000000",
        "0008051600200000300000000010000030080900000000000400400030600000051000000000",
    ];

    for raw in malformed {
        let payload = create_payload(vec![raw.to_owned()]);
        let req = test::TestRequest::post()
            .uri("/solve")
            .set_json(payload)
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "malformed data should result in a 400 response"
        );

        let res_body: ErrorResponse = test::read_body_json(res).await;
        assert_eq!(res_body.code, 400);
    }
}

/// Sends a syntactically valid but constraint-violating grid (duplicate 8s in row 0).
#[actix_web::test]
async fn test_invalid_sudoku_returns_bad_request() {
    let app = test::init_service(App::new().service(solve)).await;

    let invalid = "880070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let payload = create_payload(vec![invalid.to_owned()]);

    let req = test::TestRequest::post()
        .uri("/solve")
        .set_json(payload)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res_body: ErrorResponse = test::read_body_json(res).await;
    assert_eq!(res_body.code, 400);
}

fn create_payload(raws: Vec<String>) -> Vec<Entry> {
    raws.into_iter().map(|raw| Entry { grid: raw }).collect()
}
