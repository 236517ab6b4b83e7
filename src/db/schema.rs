diesel::table! {
    product_records (id) {
        id -> Int4,
        label -> Nullable<Varchar>,
        unit -> Nullable<Varchar>,
        normal_price -> Nullable<Float8>,
        discounted_price -> Nullable<Float8>,
        true_price -> Nullable<Float8>,
        description -> Nullable<Text>,
        base64_image -> Nullable<Text>,
        location -> Nullable<Varchar>,
        created_at -> Nullable<Timestamptz>,
    }
}
