//! Request shapes of the query families and how their replies decode.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use okchain_core::ErrorKind;
use okchain_core::error::TransportError;
use okchain_rpc::{
    DealsQuery, MatchesQuery, OrderListQuery, QueryData, TokenShow, TransactionsQuery,
};
use okchain_tests::helpers::*;
use serde_json::json;

#[test]
fn account_family_paths_and_data() {
    let transport = ScriptedTransport::new();
    for _ in 0..3 {
        transport.reply("abci_query", abci_value(&json!({"ok": true})));
    }
    let client = scripted_client(&transport);

    client.account(RECIPIENT).unwrap();
    client.account_tokens(RECIPIENT, TokenShow::All).unwrap();
    client.account_token(RECIPIENT, "okb").unwrap();

    let calls = transport.calls();
    assert_eq!(calls[0].params["path"], "custom/acc/account");
    assert_eq!(calls[0].abci_data().unwrap(), json!({"Address": RECIPIENT}));
    assert_eq!(
        calls[1].params["path"],
        format!("custom/token/accounts/{RECIPIENT}")
    );
    assert_eq!(calls[1].abci_data().unwrap(), json!({"show": "all", "symbol": ""}));
    assert_eq!(
        calls[2].abci_data().unwrap(),
        json!({"show": "partial", "symbol": "okb"})
    );
    for call in &calls {
        assert_eq!(call.method, "abci_query");
        assert_eq!(call.params["height"], "0");
        assert_eq!(call.params["prove"], false);
    }
}

#[test]
fn data_is_uppercase_hex_of_sorted_json() {
    let transport = ScriptedTransport::new();
    transport.reply("abci_query", abci_value(&json!([])));
    let client = scripted_client(&transport);

    client.depth_book("xxb_okb").unwrap();

    let call = transport.last_call();
    let data = call.params["data"].as_str().unwrap();
    assert_eq!(data, data.to_ascii_uppercase());
    let raw = hex::decode(data).unwrap();
    assert_eq!(raw, br#"{"Product":"xxb_okb","Size":"200"}"#);
}

#[test]
fn pathless_queries_send_no_data() {
    let transport = ScriptedTransport::new();
    transport
        .reply("abci_query", abci_value(&json!([])))
        .reply("abci_query", abci_value(&json!([])))
        .reply("abci_query", abci_value(&json!({"symbol": "okb"})));
    let client = scripted_client(&transport);

    client.tokens().unwrap();
    client.products().unwrap();
    let token = client.token("okb").unwrap().into_json().unwrap();
    assert_eq!(token["symbol"], "okb");

    let calls = transport.calls();
    assert_eq!(calls[0].params["path"], "custom/token/tokens");
    assert_eq!(calls[1].params["path"], "custom/token/products");
    assert_eq!(calls[2].params["path"], "custom/token/info/okb");
    assert!(calls.iter().all(|c| c.params.get("data").is_none()));
}

#[test]
fn market_history_queries() {
    let transport = ScriptedTransport::new();
    for _ in 0..7 {
        transport.reply("abci_query", abci_value(&json!({"data": []})));
    }
    let client = scripted_client(&transport);

    client.candles("60", "xxb_okb", "100").unwrap();
    client.tickers("10").unwrap();
    client
        .matches(&MatchesQuery {
            product: "xxb_okb".into(),
            page: "1".into(),
            per_page: "10".into(),
            ..Default::default()
        })
        .unwrap();
    let orders = OrderListQuery {
        address: RECIPIENT.into(),
        hide_no_fill: true,
        product: "xxb_okb".into(),
        side: "BUY".into(),
        ..Default::default()
    };
    client.open_orders(&orders).unwrap();
    client.closed_orders(&orders).unwrap();
    client
        .deals(&DealsQuery {
            address: RECIPIENT.into(),
            ..Default::default()
        })
        .unwrap();
    client
        .transactions(&TransactionsQuery {
            address: RECIPIENT.into(),
            tx_type: "1".into(),
            ..Default::default()
        })
        .unwrap();

    let calls = transport.calls();
    let paths: Vec<_> = calls.iter().map(|c| c.params["path"].clone()).collect();
    assert_eq!(
        paths,
        [
            "custom/backend/candles",
            "custom/backend/tickers",
            "custom/backend/matches",
            "custom/backend/orders/open",
            "custom/backend/orders/closed",
            "custom/backend/deals",
            "custom/backend/deals",
        ]
    );
    assert_eq!(
        calls[0].abci_data().unwrap(),
        json!({"Granularity": "60", "Product": "xxb_okb", "Size": "100"})
    );
    assert_eq!(
        calls[1].abci_data().unwrap(),
        json!({"Count": "10", "Product": "", "Sort": true})
    );
    assert_eq!(calls[2].abci_data().unwrap()["PerPage"], "10");
    assert_eq!(calls[3].abci_data().unwrap()["HideNoFill"], false);
    assert_eq!(calls[4].abci_data().unwrap()["HideNoFill"], true);
    assert_eq!(calls[6].abci_data().unwrap()["Type"], "1");
}

#[test]
fn governance_queries() {
    let transport = ScriptedTransport::new();
    transport
        .reply("abci_query", abci_value(&json!([])))
        .reply("abci_query", abci_value(&json!({"proposal_id": "3"})));
    let client = scripted_client(&transport);

    client.proposals().unwrap();
    client.proposal(3).unwrap();
    assert_eq!(client.proposal(0).unwrap_err().field(), Some("proposal_id"));

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].params["path"], "custom/gov/proposals");
    assert_eq!(
        calls[0].abci_data().unwrap(),
        json!({"Depositor": "", "Limit": "0", "ProposalStatus": "", "Voter": ""})
    );
    assert_eq!(calls[1].abci_data().unwrap(), json!({"ProposalID": "3"}));
}

#[test]
fn node_methods() {
    let transport = ScriptedTransport::new();
    transport
        .reply("block", node_result(json!({"block": {"header": {"height": "77"}}})))
        .reply("block", node_result(json!({"block": {"header": {"height": "5"}}})))
        .reply("tx", node_result(json!({"height": "5", "tx_result": {}})))
        .reply("validators", node_result(json!({"validators": []})));
    let client = scripted_client(&transport);

    let latest = client.latest_block().unwrap().into_json().unwrap();
    assert_eq!(latest["block"]["header"]["height"], "77");
    client.block(5).unwrap();
    client.tx("0A0B", true).unwrap();
    client.validators().unwrap();

    let calls = transport.calls();
    assert_eq!(calls[0].params, json!({}));
    assert_eq!(calls[1].params, json!({"height": "5"}));
    assert_eq!(
        calls[2].params,
        json!({"hash": STANDARD.encode([0x0a, 0x0b]), "prove": true})
    );
    assert_eq!(calls[3].method, "validators");
}

#[test]
fn bad_tx_hash_is_rejected_locally() {
    let transport = ScriptedTransport::new();
    let client = scripted_client(&transport);
    assert_eq!(client.tx("", false).unwrap_err().field(), Some("hash"));
    assert_eq!(client.tx("not-hex", false).unwrap_err().field(), Some("hash"));
    assert!(transport.calls().is_empty());
}

#[test]
fn failures_carry_code_and_detail() {
    let transport = ScriptedTransport::new();
    transport
        .reply("abci_query", abci_failure(6, "unknown token"))
        .reply("tx", node_error(-32603, "Internal error", "tx (0A0B) not found"))
        .reply("block", node_error(-32603, "height must be less than or equal", ""));
    let client = scripted_client(&transport);

    let token = client.token("nope").unwrap();
    assert!(!token.is_success());
    assert_eq!(token.code(), "6");
    assert_eq!(token.detail_message(), Some("unknown token"));
    let err = token.into_data().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Chain);

    let tx = client.tx("0A0B", false).unwrap();
    assert_eq!(tx.code(), "-32603");
    assert_eq!(tx.detail_message(), Some("tx (0A0B) not found"));

    let block = client.block(999_999).unwrap();
    assert_eq!(block.detail_message(), Some("height must be less than or equal"));
}

#[test]
fn text_and_binary_values_are_kept() {
    let transport = ScriptedTransport::new();
    let text = json!({"jsonrpc": "2.0", "id": 1, "result": {"response": {"value": STANDARD.encode("plain text")}}});
    let binary = json!({"jsonrpc": "2.0", "id": 1, "result": {"response": {"value": STANDARD.encode([0xff, 0x00, 0xfe])}}});
    transport.reply("abci_query", text).reply("abci_query", binary);
    let client = scripted_client(&transport);

    assert_eq!(
        client.tokens().unwrap().data(),
        Some(&QueryData::Text("plain text".into()))
    );
    assert_eq!(
        client.tokens().unwrap().data(),
        Some(&QueryData::Bytes(vec![0xff, 0x00, 0xfe]))
    );
}

#[test]
fn malformed_bodies_are_decode_errors() {
    let transport = ScriptedTransport::new();
    transport
        .reply_raw("abci_query", b"<html>bad gateway</html>".to_vec())
        .reply("abci_query", json!({"jsonrpc": "2.0", "id": 1, "result": {}}))
        .reply("abci_query", json!({"jsonrpc": "2.0", "id": 1, "result": {"response": {"value": ""}}}))
        .fail("abci_query", TransportError::Timeout);
    let client = scripted_client(&transport);

    assert_eq!(client.tokens().unwrap_err().kind(), ErrorKind::Transport);
    assert_eq!(client.tokens().unwrap_err().kind(), ErrorKind::Decode);
    assert_eq!(client.tokens().unwrap_err().kind(), ErrorKind::Decode);
    assert_eq!(client.tokens().unwrap_err().kind(), ErrorKind::Transport);
    assert_eq!(transport.remaining(), 0);
}
