//! Per-resource artifacts.

pub(super) const MODEL: &str = r#"<?php

namespace {{rootNamespace}}\Models;

class {{name}} extends ModelBase
{
    protected $table = '{{tableName}}';

    protected $fillable = [
        'name',
        'description',
    ];

    protected $casts = [
        'created_at' => 'datetime',
        'updated_at' => 'datetime',
    ];
}
"#;

pub(super) const REPOSITORY: &str = r#"<?php

namespace {{rootNamespace}}\Repositories\{{version}};

use {{rootNamespace}}\Models\{{name}};
use {{rootNamespace}}\Repositories\{{version}}\BaseRepository{{version}};

class {{name}}Repository{{version}} extends BaseRepository{{version}}
{
    const RELATIONS = [];

    public function __construct({{name}} ${{camelName}})
    {
        parent::__construct(${{camelName}}, self::RELATIONS);
    }
}
"#;

pub(super) const DTO: &str = r#"<?php

namespace {{rootNamespace}}\DTOs\{{version}};

use Illuminate\Contracts\Support\Arrayable;
use Illuminate\Support\Facades\Validator;
use Illuminate\Validation\ValidationException;

class {{name}}DTO{{version}} implements Arrayable
{
    public $id;
    public $name;
    public $description;
    public $createdAt;
    public $updatedAt;

    protected array $extra = [];

    protected function __construct(array $attributes)
    {
        $this->id = $attributes['id'] ?? null;
        $this->name = $attributes['name'] ?? '';
        $this->description = $attributes['description'] ?? null;
        $this->createdAt = $attributes['created_at'] ?? null;
        $this->updatedAt = $attributes['updated_at'] ?? null;
        $this->extra = array_diff_key($attributes, array_flip(['id', 'name', 'description', 'created_at', 'updated_at']));
    }

    public static function rules(): array
    {
        return [
            'name' => 'required|string|max:255',
            'description' => 'nullable|string',
        ];
    }

    public static function fromRequest(array $data): self
    {
        $validated = self::validate($data);
        return new self($validated);
    }

    public static function fromModel($model): self
    {
        return new self($model->toArray());
    }

    public static function validate(array $data): array
    {
        $validator = Validator::make($data, self::rules());

        if ($validator->fails()) {
            throw new ValidationException($validator);
        }

        return $validator->validated();
    }

    public function toArray(): array
    {
        return [
            'id' => $this->id,
            'name' => $this->name,
            'description' => $this->description,
            'created_at' => $this->createdAt,
            'updated_at' => $this->updatedAt,
            'extra' => $this->extra,
        ];
    }

    public function getExtra(): array
    {
        return $this->extra;
    }
}
"#;

pub(super) const EXCEPTION: &str = r#"<?php

namespace {{rootNamespace}}\Exceptions;

use Exception;
use Illuminate\Http\Response;
use {{rootNamespace}}\Interfaces\{{version}}\ApiRenderableException{{version}};

class {{name}}Exception extends Exception implements ApiRenderableException{{version}}
{
    private ?string $developerHint;

    public function __construct(
        string $message = '{{name}} error occurred',
        ?string $developerHint = null,
        int $code = Response::HTTP_BAD_REQUEST,
        ?Exception $previous = null
    ) {
        parent::__construct($message, $code, $previous);
        $this->developerHint = $developerHint;
    }

    public function getStatusCode(): int
    {
        return $this->getCode();
    }

    public function getUserMessage(): string
    {
        return $this->getMessage();
    }

    public function getDeveloperHint(): ?string
    {
        return $this->developerHint;
    }
}
"#;

pub(super) const SERVICE: &str = r#"<?php

namespace {{rootNamespace}}\Services\Api\{{version}};

use {{rootNamespace}}\Models\{{name}};
use {{rootNamespace}}\Exceptions\{{name}}Exception;
use {{rootNamespace}}\Repositories\{{version}}\{{name}}Repository{{version}};
use {{rootNamespace}}\DTOs\{{version}}\{{name}}DTO{{version}};
use Illuminate\Http\Response;

class {{name}}Service{{version}}
{
    public function __construct(private {{name}}Repository{{version}} ${{camelName}}Repository) {}

    public function getAll{{name}}s($filters, $perPage)
    {
        try {
            return {{name}}::filter($filters)->paginate($perPage);
        } catch (\Exception $e) {
            throw new {{name}}Exception(
                'Failed to retrieve {{name}}s',
                developerHint: $e->getMessage(),
                code: Response::HTTP_INTERNAL_SERVER_ERROR,
                previous: $e
            );
        }
    }

    public function get{{name}}ById({{name}} ${{camelName}})
    {
        try {
            $result = $this->{{camelName}}Repository->find(${{camelName}});
        } catch (\Exception $e) {
            throw new {{name}}Exception(
                'Failed to retrieve {{name}}',
                developerHint: $e->getMessage(),
                code: Response::HTTP_INTERNAL_SERVER_ERROR,
                previous: $e
            );
        }

        if (!$result) {
            throw new {{name}}Exception('{{name}} not found', code: Response::HTTP_NOT_FOUND);
        }

        return $result;
    }

    public function create{{name}}({{name}}DTO{{version}} $dto)
    {
        try {
            return $this->{{camelName}}Repository->create($dto->toArray());
        } catch (\Exception $e) {
            throw new {{name}}Exception(
                'Failed to create {{name}}',
                developerHint: $e->getMessage(),
                code: Response::HTTP_INTERNAL_SERVER_ERROR,
                previous: $e
            );
        }
    }

    public function update{{name}}({{name}} ${{camelName}}, {{name}}DTO{{version}} $dto)
    {
        try {
            return $this->{{camelName}}Repository->update(${{camelName}}, $dto->toArray());
        } catch (\Exception $e) {
            throw new {{name}}Exception(
                'Failed to update {{name}}',
                developerHint: $e->getMessage(),
                code: Response::HTTP_INTERNAL_SERVER_ERROR,
                previous: $e
            );
        }
    }

    public function delete{{name}}({{name}} ${{camelName}})
    {
        try {
            return $this->{{camelName}}Repository->delete(${{camelName}});
        } catch (\Exception $e) {
            throw new {{name}}Exception(
                'Failed to delete {{name}}',
                developerHint: $e->getMessage(),
                code: Response::HTTP_INTERNAL_SERVER_ERROR,
                previous: $e
            );
        }
    }
}
"#;

pub(super) const FILTER: &str = r#"<?php

namespace {{rootNamespace}}\Filters;

class {{name}}Filter extends QueryFilter
{
    protected array $sortable = [
        'name',
        'createdAt' => 'created_at',
        'updatedAt' => 'updated_at',
    ];

    public function name(string $value): void
    {
        $this->builder->where('name', 'LIKE', "%$value%");
    }

    public function createdAt(string $value): void
    {
        $dates = explode(',', $value);

        if (count($dates) > 1) {
            $this->builder->whereBetween('created_at', $dates);
        } else {
            $this->builder->whereDate('created_at', $value);
        }
    }

    public function updatedAt(string $value): void
    {
        $dates = explode(',', $value);

        if (count($dates) > 1) {
            $this->builder->whereBetween('updated_at', $dates);
        } else {
            $this->builder->whereDate('updated_at', $value);
        }
    }

    public function include(string $value): void
    {
        $this->builder->with(explode(',', $value));
    }
}
"#;

pub(super) const CONTROLLER: &str = r#"<?php

namespace {{rootNamespace}}\Http\Controllers\Api\{{version}};

use {{rootNamespace}}\Models\{{name}};
use {{rootNamespace}}\Filters\{{name}}Filter;
use {{rootNamespace}}\Services\Api\{{version}}\{{name}}Service{{version}};
use {{rootNamespace}}\Http\Controllers\Api\{{version}}\ApiController{{version}};
use {{rootNamespace}}\Http\Resources\Api\{{version}}\{{name}}\{{name}}Resource{{version}};
use {{rootNamespace}}\Http\Requests\Api\{{version}}\{{name}}\Store{{name}}Request{{version}};
use {{rootNamespace}}\Http\Requests\Api\{{version}}\{{name}}\Update{{name}}Request{{version}};
use {{rootNamespace}}\DTOs\{{version}}\{{name}}DTO{{version}};

class {{name}}Controller{{version}} extends ApiController{{version}}
{
    public function __construct(private {{name}}Service{{version}} ${{camelName}}Service) {}

    public function index({{name}}Filter $filters)
    {
        try {
            $perPage = request()->input('per_page', 10);
            ${{camelName}}s = $this->{{camelName}}Service->getAll{{name}}s($filters, $perPage);

            return $this->ok('{{name}}s retrieved successfully', {{name}}Resource{{version}}::collection(${{camelName}}s));
        } catch (\Throwable $e) {
            return $this->handleException($e);
        }
    }

    public function store(Store{{name}}Request{{version}} $request)
    {
        try {
            $dto = {{name}}DTO{{version}}::fromRequest($request->validated());
            ${{camelName}} = $this->{{camelName}}Service->create{{name}}($dto);

            return $this->ok('{{name}} created successfully', new {{name}}Resource{{version}}(${{camelName}}));
        } catch (\Throwable $e) {
            return $this->handleException($e);
        }
    }

    public function show({{name}} ${{camelName}})
    {
        try {
            ${{camelName}} = $this->{{camelName}}Service->get{{name}}ById(${{camelName}});

            return $this->ok('{{name}} retrieved successfully', new {{name}}Resource{{version}}(${{camelName}}));
        } catch (\Throwable $e) {
            return $this->handleException($e);
        }
    }

    public function update(Update{{name}}Request{{version}} $request, {{name}} ${{camelName}})
    {
        try {
            $dto = {{name}}DTO{{version}}::fromRequest($request->validated());
            ${{camelName}} = $this->{{camelName}}Service->update{{name}}(${{camelName}}, $dto);

            return $this->ok('{{name}} updated successfully', new {{name}}Resource{{version}}(${{camelName}}));
        } catch (\Throwable $e) {
            return $this->handleException($e);
        }
    }

    public function destroy({{name}} ${{camelName}})
    {
        try {
            $this->{{camelName}}Service->delete{{name}}(${{camelName}});

            return $this->ok('{{name}} deleted successfully');
        } catch (\Throwable $e) {
            return $this->handleException($e);
        }
    }
}
"#;

/// One line, inserted into the routes file by the emitter.
pub(super) const ROUTE_FRAGMENT: &str = r#"Route::apiResource('{{routeSegment}}', \{{rootNamespace}}\Http\Controllers\Api\{{version}}\{{name}}Controller{{version}}::class);"#;

/// Route group of one version, appended when the routes file has none.
pub(super) const ROUTE_GROUP: &str = r#"Route::prefix('{{versionLower}}')->group(function () {
});
"#;

/// Seed for a routes file that does not exist yet. Must contain the route
/// group of its version.
pub(super) const ROUTES_FILE: &str = r#"<?php

use Illuminate\Support\Facades\Route;

Route::prefix('{{versionLower}}')->group(function () {
});
"#;
