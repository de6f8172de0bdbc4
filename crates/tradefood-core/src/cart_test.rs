use super::*;

fn make_product(id: &str, price: Decimal) -> Product {
    Product {
        id: id.to_owned(),
        title: format!("Produit {id}"),
        description: String::new(),
        price,
        original_price: None,
        image: "https://placehold.co/600x400".to_owned(),
        images: Vec::new(),
        category: None,
        in_stock: true,
        rating: None,
        review_count: None,
        featured: false,
        origin: None,
        weight: None,
        dimensions: None,
    }
}

fn eur(units: i64) -> Decimal {
    Decimal::from(units)
}

// -----------------------------------------------------------------------
// add
// -----------------------------------------------------------------------

#[test]
fn add_appends_new_product() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 2);
    cart.add(make_product("b", eur(5)), 1);
    let ids: Vec<_> = cart.items().iter().map(CartItem::product_id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn add_existing_product_accumulates_quantity() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 2);
    cart.add(make_product("a", eur(10)), 3);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get("a").map(CartItem::quantity), Some(5));
}

#[test]
fn add_zero_quantity_is_noop() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 0);
    assert!(cart.is_empty());
}

// -----------------------------------------------------------------------
// remove / update_quantity
// -----------------------------------------------------------------------

#[test]
fn remove_reports_whether_product_was_present() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 1);
    assert!(cart.remove("a"));
    assert!(!cart.remove("a"));
    assert!(cart.is_empty());
}

#[test]
fn update_quantity_sets_exact_value() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 1);
    cart.update_quantity("a", 7);
    assert_eq!(cart.get("a").map(CartItem::quantity), Some(7));
}

#[test]
fn update_quantity_zero_removes_item() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 3);
    cart.update_quantity("a", 0);
    assert!(cart.get("a").is_none());
}

#[test]
fn update_quantity_negative_removes_item() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 3);
    cart.update_quantity("a", -1);
    assert!(cart.get("a").is_none());
}

#[test]
fn update_quantity_unknown_product_is_ignored() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 1);
    cart.update_quantity("zzz", 4);
    assert_eq!(cart.len(), 1);
    assert!(cart.get("zzz").is_none());
}

#[test]
fn mutation_canonical_turns_non_positive_update_into_remove() {
    let m = CartMutation::UpdateQuantity {
        product_id: "a".to_owned(),
        quantity: 0,
    };
    assert_eq!(
        m.canonical(),
        CartMutation::Remove {
            product_id: "a".to_owned()
        }
    );

    let kept = CartMutation::UpdateQuantity {
        product_id: "a".to_owned(),
        quantity: 2,
    };
    assert_eq!(kept.clone().canonical(), kept);
}

// -----------------------------------------------------------------------
// derived queries
// -----------------------------------------------------------------------

#[test]
fn total_and_item_count() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 2);
    cart.add(make_product("b", eur(5)), 1);
    assert_eq!(cart.total(), eur(25));
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn total_of_empty_cart_is_zero() {
    let cart = Cart::new();
    assert_eq!(cart.total(), Decimal::ZERO);
    assert_eq!(cart.item_count(), 0);
}

#[test]
fn total_keeps_cents_exact() {
    let mut cart = Cart::new();
    cart.add(make_product("a", Decimal::new(1999, 2)), 3);
    assert_eq!(cart.total(), Decimal::new(5997, 2));
}

#[test]
fn line_total_saturates_instead_of_overflowing() {
    let mut cart = Cart::new();
    cart.add(make_product("a", Decimal::MAX), 2);
    assert_eq!(cart.items()[0].line_total(), Decimal::MAX);
    assert_eq!(cart.total(), Decimal::MAX);
}

#[test]
fn total_saturates_across_lines() {
    let mut cart = Cart::new();
    cart.add(make_product("a", Decimal::MAX), 1);
    cart.add(make_product("b", eur(1)), 1);
    assert_eq!(cart.items()[0].line_total(), Decimal::MAX);
    assert_eq!(cart.total(), Decimal::MAX);
    assert_eq!(cart.item_count(), 2);
}

// -----------------------------------------------------------------------
// apply / from_lines
// -----------------------------------------------------------------------

#[test]
fn apply_sequence_matches_direct_reducer_calls() {
    let a = make_product("a", eur(10));
    let b = make_product("b", eur(4));
    let mutations = vec![
        CartMutation::Add {
            product: a.clone(),
            quantity: 1,
        },
        CartMutation::Add {
            product: b.clone(),
            quantity: 2,
        },
        CartMutation::Add {
            product: a.clone(),
            quantity: 2,
        },
        CartMutation::UpdateQuantity {
            product_id: "b".to_owned(),
            quantity: 5,
        },
        CartMutation::Remove {
            product_id: "a".to_owned(),
        },
        CartMutation::Add {
            product: a.clone(),
            quantity: 1,
        },
    ];

    let mut via_apply = Cart::new();
    for m in &mutations {
        via_apply.apply(m);
    }

    let mut direct = Cart::new();
    direct.add(a.clone(), 1);
    direct.add(b, 2);
    direct.add(a.clone(), 2);
    direct.update_quantity("b", 5);
    direct.remove("a");
    direct.add(a, 1);

    assert_eq!(via_apply, direct);
    let ids: Vec<_> = via_apply.items().iter().map(CartItem::product_id).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn apply_clear_empties_cart() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(10)), 1);
    cart.apply(&CartMutation::Clear);
    assert!(cart.is_empty());
}

#[test]
fn from_lines_merges_duplicates_and_drops_non_positive() {
    let cart = Cart::from_lines(vec![
        (make_product("a", eur(1)), 2),
        (make_product("b", eur(1)), 0),
        (make_product("a", eur(1)), 1),
        (make_product("c", eur(1)), -3),
    ]);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get("a").map(CartItem::quantity), Some(3));
}

// -----------------------------------------------------------------------
// serde
// -----------------------------------------------------------------------

#[test]
fn serde_roundtrip_preserves_cart() {
    let mut cart = Cart::new();
    cart.add(make_product("a", Decimal::new(1250, 2)), 2);
    cart.add(make_product("b", eur(3)), 1);
    let json = serde_json::to_string(&cart).expect("serialization failed");
    let decoded: Cart = serde_json::from_str(&json).expect("deserialization failed");
    assert_eq!(decoded, cart);
}

#[test]
fn deserialize_enforces_invariants() {
    let product = serde_json::to_value(make_product("a", eur(2))).unwrap();
    let doc = serde_json::json!({
        "items": [
            { "product": product, "quantity": 1 },
            { "product": product, "quantity": 4 },
            { "product": product, "quantity": -2 },
        ]
    });
    let cart: Cart = serde_json::from_value(doc).unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.item_count(), 5);
}

#[test]
fn oversized_update_saturates() {
    let mut cart = Cart::new();
    cart.add(make_product("a", eur(1)), 1);
    cart.update_quantity("a", i64::MAX);
    assert_eq!(cart.get("a").map(CartItem::quantity), Some(u32::MAX));
    assert_eq!(clamp_quantity(-3), 0);
    assert_eq!(clamp_quantity(7), 7);
}
