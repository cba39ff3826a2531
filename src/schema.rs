table! {
    admin_logins (token) {
        token -> Char,
        aid -> Varchar,
        login_time -> Datetime,
    }
}

table! {
    appointments (aid) {
        aid -> Char,
        seq -> Unsigned<Bigint>,
        user_id -> Char,
        doc_id -> Char,
        slot_date -> Varchar,
        slot_time -> Varchar,
        user_data -> Text,
        doc_data -> Text,
        amount -> Integer,
        created_at -> Datetime,
        cancelled -> Bool,
        payment -> Bool,
        is_completed -> Bool,
    }
}

table! {
    doctor_logins (token) {
        token -> Char,
        did -> Char,
        login_time -> Datetime,
    }
}

table! {
    doctors (did) {
        did -> Char,
        name -> Varchar,
        email -> Varchar,
        password -> Varchar,
        image -> Varchar,
        speciality -> Varchar,
        degree -> Varchar,
        experience -> Varchar,
        about -> Text,
        available -> Bool,
        fees -> Integer,
        address -> Text,
        created_at -> Datetime,
        slots_booked -> Text,
    }
}

table! {
    user_logins (token) {
        token -> Char,
        uid -> Char,
        login_time -> Datetime,
    }
}

table! {
    users (uid) {
        uid -> Char,
        name -> Varchar,
        email -> Varchar,
        password -> Varchar,
        image -> Varchar,
        phone -> Varchar,
        address -> Text,
        gender -> Varchar,
        dob -> Varchar,
    }
}

allow_tables_to_appear_in_same_query!(
    admin_logins,
    appointments,
    doctor_logins,
    doctors,
    user_logins,
    users,
);
