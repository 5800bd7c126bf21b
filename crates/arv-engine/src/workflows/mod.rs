pub mod arv;
