mod favorite;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod recipe_tag;
mod shopping_cart;
mod subscription;
mod tag;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "foodgram",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateIdx1,
        user::CreateIdx2,
        subscription::CreateTable,
        subscription::CreateIdx1,
        subscription::CreateIdx2,
        ingredient::CreateTable,
        ingredient::CreateIdx1,
        tag::CreateTable,
        tag::CreateIdx1,
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe::CreateIdx2,
        recipe::CreateIdx3,
        recipe_ingredient::CreateTable,
        recipe_ingredient::CreateIdx1,
        recipe_ingredient::CreateIdx2,
        recipe_tag::CreateTable,
        recipe_tag::CreateIdx1,
        recipe_tag::CreateIdx2,
        favorite::CreateTable,
        favorite::CreateIdx1,
        shopping_cart::CreateTable,
        shopping_cart::CreateIdx1
    ]
);
