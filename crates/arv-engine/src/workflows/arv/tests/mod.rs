mod common;

mod similarity;
