use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum User {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Password,
    Avatar,
    IsSuperuser,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Subscription {
    Table,
    Id,
    UserId,
    AuthorId,
}

#[derive(Iden, Clone, Copy)]
pub enum Ingredient {
    Table,
    Id,
    Name,
    MeasurementUnit,
}

#[derive(Iden, Clone, Copy)]
pub enum Tag {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(Iden, Clone, Copy)]
pub enum Recipe {
    Table,
    Id,
    AuthorId,
    Name,
    Image,
    Text,
    CookingTime,
    ShortLink,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeIngredient {
    Table,
    Id,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeTag {
    Table,
    RecipeId,
    TagId,
}

#[derive(Iden, Clone, Copy)]
pub enum Favorite {
    Table,
    Id,
    UserId,
    RecipeId,
}

#[derive(Iden, Clone, Copy)]
pub enum ShoppingCart {
    Table,
    Id,
    UserId,
    RecipeId,
}
