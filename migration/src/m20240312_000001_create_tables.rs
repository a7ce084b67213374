use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 角色表
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Roles::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户角色关联表
        manager
            .create_table(
                Table::create()
                    .table(UsersRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsersRoles::UserId).string().not_null())
                    .col(ColumnDef::new(UsersRoles::RoleId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(UsersRoles::UserId)
                            .col(UsersRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UsersRoles::Table, UsersRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UsersRoles::Table, UsersRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Lectures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lectures::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lectures::Title).string().not_null())
                    .col(ColumnDef::new(Lectures::Description).text().null())
                    .col(ColumnDef::new(Lectures::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Lectures::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程资料表
        manager
            .create_table(
                Table::create()
                    .table(LectureMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LectureMaterials::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LectureMaterials::Document).string().not_null())
                    .col(ColumnDef::new(LectureMaterials::LectureId).string().null())
                    .col(
                        ColumnDef::new(LectureMaterials::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LectureMaterials::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LectureMaterials::Table, LectureMaterials::LectureId)
                            .to(Lectures::Table, Lectures::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_roles_role_id")
                    .table(UsersRoles::Table)
                    .col(UsersRoles::RoleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lecture_materials_lecture_id")
                    .table(LectureMaterials::Table)
                    .col(LectureMaterials::LectureId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(LectureMaterials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lectures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UsersRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Username,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Roles {
    #[sea_orm(iden = "roles")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum UsersRoles {
    #[sea_orm(iden = "users_roles")]
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum Lectures {
    #[sea_orm(iden = "lectures")]
    Table,
    Id,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LectureMaterials {
    #[sea_orm(iden = "lecture_materials")]
    Table,
    Id,
    Document,
    LectureId,
    CreatedAt,
    UpdatedAt,
}
